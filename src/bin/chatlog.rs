#[path = "chatlog/app.rs"]
mod app;
#[path = "chatlog/args.rs"]
mod args;
#[path = "chatlog/logging.rs"]
mod logging;

fn main() -> anyhow::Result<()> {
    app::run()
}

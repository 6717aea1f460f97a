use clap::Parser;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "WebBrowser")]
#[command(version, about = "A modern web browser built with Rust and the system webview", long_about = None)]
pub struct Cli {
    /// Open specified URL on startup
    #[arg(short, long, value_name = "url")]
    pub url: Option<String>,
}

impl Cli {
    /// Parses the argv a second launch forwarded to the running instance.
    pub fn from_forwarded_args(argv: &[String]) -> Option<Self> {
        match Cli::try_parse_from(argv) {
            Ok(cli) => Some(cli),
            Err(e) => {
                log::warn!("[Cli] Ignoring forwarded arguments {:?}: {}", argv, e);
                None
            }
        }
    }
}

use clap::{Parser, Subcommand};

/// Mock authentication gateway for the uploaders API
#[derive(Parser)]
#[command(name = "uploader-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to bind (defaults to UPLOADERS_PORT or 61222)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

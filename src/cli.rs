use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "tubemark")]
#[command(about = "Resolve titles and thumbnails for saved YouTube links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP resolution service
    Serve(ServeArgs),
    /// Resolve one URL and print the result as JSON
    Resolve(ResolveArgs),
    /// Probe both lookup providers and print their status as JSON
    Health,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to (defaults to `server.bind_addr`)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// YouTube video or playlist link
    pub url: String,
}

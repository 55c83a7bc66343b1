//! Central module for application-wide configuration settings.
//!
//! Settings are parsed once at startup from command line flags, each falling
//! back to the environment variable the service is deployed with.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use adapters::vocab::DEFAULT_GROUP_TYPE;
use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "login-service", about = "JSON:API login service backed by a SPARQL store")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 80)]
    pub port: u16,

    /// SPARQL endpoint of the triple store
    #[arg(long, env = "MU_SPARQL_ENDPOINT", default_value = "http://database:8890/sparql")]
    pub sparql_endpoint: String,

    /// RDF class of the groups an account can log in to
    #[arg(long, env = "GROUP_TYPE", default_value = DEFAULT_GROUP_TYPE)]
    pub group_type: String,

    /// Send store queries with the mu-auth-sudo header
    #[arg(long, env = "MU_AUTH_SUDO", default_value_t = true, action = ArgAction::Set)]
    pub sudo: bool,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

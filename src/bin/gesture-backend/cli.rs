use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;

// Some defaults; some of which can be overriden via CLI args
const CONFIG_FILE_PATH: &str = "./providers.json";
const TETHER_HOST: std::net::IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
const API_BASE_URL: &str = "http://localhost:8000";
const REMOTE_POLL_INTERVAL: u64 = 200;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where to load Landmark Provider config
    #[arg(long="providerConfigPath",default_value_t=String::from(CONFIG_FILE_PATH))]
    pub config_path: String,

    /// The IP address of the MQTT broker (server)
    #[arg(long = "tether.host", default_value_t=TETHER_HOST)]
    pub tether_host: std::net::IpAddr,

    /// The Agent Role (type)
    #[arg(long="tether.role",default_value_t=String::from("gestureFeedback"))]
    pub agent_role: String,

    /// The Agent Group (ID)
    #[arg(long="tether.group",default_value_t=String::from("any"))]
    pub agent_group: String,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,

    /// Base URL of the feedback REST API
    #[arg(long="api.baseUrl",default_value_t=String::from(API_BASE_URL))]
    pub api_base_url: String,

    /// Flag to disable feedback API calls; gesture events are still published
    #[arg(long = "api.disable")]
    pub api_disable: bool,

    /// Optional URL of a remote landmark inference endpoint to poll, as an
    /// alternative to providers publishing landmark frames via Tether
    #[arg(long = "remoteProvider.url")]
    pub remote_url: Option<String>,

    /// Provider ID (serial) to use for frames fetched from the remote endpoint
    #[arg(long="remoteProvider.id",default_value_t=String::from("remote"))]
    pub remote_id: String,

    /// How often (ms) to poll the remote landmark endpoint
    #[arg(long = "remoteProvider.interval", default_value_t = REMOTE_POLL_INTERVAL)]
    pub remote_poll_interval: u64,
}

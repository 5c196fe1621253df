use std::path::PathBuf;

use clap::Parser;
use vault_backend::VaultClientBuilder;

/// Print every secret of the Vault kv mounts behind PREFIXES as flat JSON
#[derive(Debug, Parser)]
#[command(name = "vault-fetch", version)]
pub struct Cli {
    /// Vault server address
    #[arg(long, env = "VAULT_ADDR")]
    pub address: String,

    /// app-role, app-id, github, token, userpass, kubernetes or cert
    #[arg(long, env = "VAULT_AUTH_TYPE")]
    pub auth_type: String,

    /// Auth option as KEY=VALUE (role-id, secret-id, token, username, path, cert, key, caCert, ...)
    #[arg(short = 'o', long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Service-account token read by the kubernetes auth type
    #[arg(long, env = "K8S_JWT_TOKEN_PATH")]
    pub k8s_jwt_path: Option<PathBuf>,

    /// After printing, block until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Key prefixes, e.g. /secret/app/*
    #[arg(required = true)]
    pub prefixes: Vec<String>,
}

impl Cli {
    /// Credentials from the environment, overridden by flags
    pub fn builder(&self) -> VaultClientBuilder {
        let builder = VaultClientBuilder::from_env()
            .address(self.address.clone())
            .auth_type(self.auth_type.clone())
            .params(self.options.iter().cloned());

        match &self.k8s_jwt_path {
            Some(path) => builder.k8s_jwt_path(path.clone()),
            None => builder,
        }
    }
}

fn parse_option(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))
}

use clap::{Parser, Subcommand};
use pkg_constants::network::DEFAULT_API_ADDR;
use pkg_constants::paths::DEFAULT_CLIENT_CONFIG;
use pkg_types::cluster::ClusterInfo;
use pkg_types::config::{ClientConfigFile, load_config_file};
use pkg_types::limitrange::LimitRange;
use pkg_types::quota::ResourceQuota;
use pkg_types::status::ResourceQuotasStatus;
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Parser)]
#[command(name = "consolectl", about = "CLI tool for the console backend")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, default_value = DEFAULT_CLIENT_CONFIG)]
    config: String,

    /// Server API endpoint
    #[arg(long)]
    server: Option<String>,

    /// Bearer token for the API
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cluster information
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },
    /// Inspect resource quotas
    Quota {
        #[command(subcommand)]
        action: QuotaAction,
    },
    /// Inspect limit ranges
    Limitrange {
        #[command(subcommand)]
        action: LimitRangeAction,
    },
}

#[derive(Subcommand)]
enum ClusterAction {
    /// Display cluster info
    Info,
}

#[derive(Subcommand)]
enum QuotaAction {
    /// Which quotas block workloads that are scaling up
    Status {
        #[arg(long, short)]
        namespace: Option<String>,
    },
    /// List quotas with hard and used values
    List {
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

#[derive(Subcommand)]
enum LimitRangeAction {
    /// List limit ranges and their container defaults
    List {
        #[arg(long, short)]
        namespace: Option<String>,
    },
}

struct ApiClient {
    http: reqwest::Client,
    server: String,
    token: Option<String>,
}

impl ApiClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}{}", self.server.trim_end_matches('/'), path);
        info!("GET {}", url);
        let mut req = self.http.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("server returned {}: {}", status, body.trim());
        }
        Ok(resp.json().await?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    // Merge: CLI args > config file > defaults
    let file_cfg: ClientConfigFile = load_config_file(&cli.config)?;
    let client = ApiClient {
        http: reqwest::Client::new(),
        server: cli
            .server
            .or(file_cfg.server)
            .unwrap_or_else(|| DEFAULT_API_ADDR.to_string()),
        token: cli.token.or(file_cfg.token),
    };
    let namespace = |ns: &Option<String>| {
        ns.clone()
            .or_else(|| file_cfg.namespace.clone())
            .unwrap_or_else(|| "default".to_string())
    };

    match &cli.command {
        Commands::Cluster { action } => match action {
            ClusterAction::Info => {
                let info: ClusterInfo = client.get("/api/v1/cluster/info").await?;
                println!("Endpoint:     {}", info.endpoint);
                println!("Version:      {}", info.version);
                println!("State Store:  {}", info.state_store);
                println!("Cache Synced: {}", info.cache_synced);
                println!("Namespaces:   {}", info.namespace_count);
            }
        },
        Commands::Quota { action } => match action {
            QuotaAction::Status { namespace: ns } => {
                let ns = namespace(ns);
                let status: ResourceQuotasStatus = client
                    .get(&format!("/api/v1/namespaces/{}/resourcequotasstatus", ns))
                    .await?;
                print!("{}", render_quota_status(&status));
            }
            QuotaAction::List { namespace: ns } => {
                let ns = namespace(ns);
                let quotas: Vec<ResourceQuota> = client
                    .get(&format!("/api/v1/namespaces/{}/resourcequotas", ns))
                    .await?;
                print!("{}", render_quotas(&quotas));
            }
        },
        Commands::Limitrange { action } => match action {
            LimitRangeAction::List { namespace: ns } => {
                let ns = namespace(ns);
                let ranges: Vec<LimitRange> = client
                    .get(&format!("/api/v1/namespaces/{}/limitranges", ns))
                    .await?;
                print!("{}", render_limit_ranges(&ranges));
            }
        },
    }

    Ok(())
}

fn render_quota_status(status: &ResourceQuotasStatus) -> String {
    let mut out = format!("Exceeded: {}\n", status.exceeded);
    if status.exceeded_quotas.is_empty() {
        return out;
    }
    out.push_str(&format!("{:<24} {:<16} {}\n", "QUOTA", "RESOURCE", "AFFECTED"));
    for entry in &status.exceeded_quotas {
        out.push_str(&format!(
            "{:<24} {:<16} {}\n",
            entry.quota_name,
            entry.resource_name,
            entry.affected_resources.join(",")
        ));
    }
    out
}

fn render_quotas(quotas: &[ResourceQuota]) -> String {
    if quotas.is_empty() {
        return "(no resource quotas)\n".to_string();
    }
    let mut out = format!("{:<24} {:<16} {:<10} {}\n", "NAME", "RESOURCE", "USED", "HARD");
    for quota in quotas {
        for (resource, hard) in &quota.hard {
            let used = quota
                .used
                .get(resource)
                .map(|q| q.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<24} {:<16} {:<10} {}\n",
                quota.name,
                resource.as_str(),
                used,
                hard
            ));
        }
    }
    out
}

fn render_limit_ranges(ranges: &[LimitRange]) -> String {
    if ranges.is_empty() {
        return "(no limit ranges)\n".to_string();
    }
    let mut out = format!(
        "{:<24} {:<10} {:<12} {:<12} {:<12} {}\n",
        "NAME", "TYPE", "DEFAULT-CPU", "DEFAULT-MEM", "REQUEST-CPU", "REQUEST-MEM"
    );
    for range in ranges {
        for item in &range.limits {
            out.push_str(&format!(
                "{:<24} {:<10} {:<12} {:<12} {:<12} {}\n",
                range.name,
                format!("{:?}", item.limit_type),
                item.default.cpu.to_string(),
                item.default.memory.to_string(),
                item.default_request.cpu.to_string(),
                item.default_request.memory,
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pkg_types::resource::ResourceName;
    use pkg_types::status::ExceededQuota;

    #[test]
    fn status_table_lists_affected_workloads() {
        let status = ResourceQuotasStatus {
            exceeded: true,
            exceeded_quotas: vec![ExceededQuota {
                quota_name: "compute".to_string(),
                resource_name: "requests.memory".to_string(),
                affected_resources: vec!["ReplicaSet/api".to_string(), "StatefulSet/db".to_string()],
            }],
        };
        let out = render_quota_status(&status);
        assert!(out.starts_with("Exceeded: true\n"));
        assert!(out.contains("compute"));
        assert!(out.contains("ReplicaSet/api,StatefulSet/db"));
    }

    #[test]
    fn status_without_entries_is_one_line() {
        let out = render_quota_status(&ResourceQuotasStatus::default());
        assert_eq!(out, "Exceeded: false\n");
    }

    #[test]
    fn quota_rows_show_missing_used_as_dash() {
        let quota = ResourceQuota {
            name: "compute".to_string(),
            namespace: "prod".to_string(),
            hard: [(ResourceName::RequestsMemory, "1Gi".parse().unwrap())].into(),
            used: Default::default(),
            created_at: Utc::now(),
        };
        let out = render_quotas(&[quota]);
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("requests.memory"));
        assert!(row.contains(" - "));
        assert!(row.ends_with("1Gi"));
    }
}

use crate::error::RiverError;
use crate::river::{RiverRecord, RIVER_QUERY};
use async_trait::async_trait;
use futures::TryStreamExt;
use std::time::Duration;
use tiberius::{error::Error as TdsError, Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

/// Source of river rows. Each call owns its connection for the duration of the call.
#[async_trait]
pub trait RiverStore: Send + Sync {
    async fn fetch_rivers(&self, connection_string: &str) -> Result<Vec<RiverRecord>, RiverError>;
}

type SqlClient = Client<Compat<TcpStream>>;

/// SQL Server backed store. Opens a fresh connection per call.
#[derive(Debug, Clone, Default)]
pub struct SqlServerStore {
    connect_timeout: Option<Duration>,
}

impl SqlServerStore {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }

    async fn connect(&self, config: Config) -> Result<SqlClient, RiverError> {
        match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect_following_redirect(config))
                .await
                .map_err(|_| {
                    RiverError::DataAccess(format!(
                        "connection timed out after {}s",
                        limit.as_secs()
                    ))
                })?,
            None => connect_following_redirect(config).await,
        }
    }
}

#[async_trait]
impl RiverStore for SqlServerStore {
    async fn fetch_rivers(&self, connection_string: &str) -> Result<Vec<RiverRecord>, RiverError> {
        let config = Config::from_ado_string(connection_string)?;
        let mut client = self.connect(config).await?;

        let mut rivers = Vec::new();
        {
            let mut rows = client.simple_query(RIVER_QUERY).await?.into_row_stream();
            while let Some(row) = rows.try_next().await? {
                rivers.push(RiverRecord::from_row(&row)?);
            }
        }
        debug!("Fetched {} river row(s)", rivers.len());

        client.close().await?;
        Ok(rivers)
    }
}

async fn open(config: Config) -> Result<SqlClient, TdsError> {
    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    Client::connect(config, tcp.compat_write()).await
}

// Azure SQL gateways answer the login with a redirect to the node hosting the database.
async fn connect_following_redirect(config: Config) -> Result<SqlClient, RiverError> {
    match open(config.clone()).await {
        Ok(client) => Ok(client),
        Err(TdsError::Routing { host, port }) => {
            debug!(%host, port, "Following server redirect");
            let mut config = config;
            config.host(&host);
            config.port(port);
            Ok(open(config).await?)
        }
        Err(e) => Err(e.into()),
    }
}

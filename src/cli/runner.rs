//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::client::IntacctClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::objects::CustomObjects;
use crate::types::{Params, Record};
use anyhow::Context;
use std::io::Write;

/// CLI runner
pub struct Runner {
    cli: Cli,
    objects: CustomObjects,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            objects: CustomObjects::new(),
        }
    }

    /// Run the command, printing records to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_writer(&mut out).await
    }

    /// Run the command, writing one JSON record per line to `out`
    pub async fn run_with_writer<W: Write>(&self, out: &mut W) -> Result<()> {
        let client = self.client()?;

        let records = match &self.cli.command {
            Commands::ReadView { view, page_size } => {
                let mut params = self.base_params().with("view", view.as_str());
                if let Some(page_size) = page_size {
                    params.insert("page_size", *page_size);
                }
                self.objects
                    .read_view(&params, &client)
                    .await?
                    .into_records()
            }
            Commands::ViewRecords {
                view,
                page_size,
                max_total_count,
            } => {
                let mut params = self.base_params().with("view", view.as_str());
                if let Some(page_size) = page_size {
                    params.insert("page_size", *page_size);
                }
                if let Some(max) = max_total_count {
                    params.insert("max_total_count", *max);
                }
                self.objects.get_view_records(&params, &client).await?
            }
            Commands::ReadRelated {
                object,
                relation,
                keys,
                fields,
            } => {
                let mut params = self
                    .base_params()
                    .with("object", object.as_str())
                    .with("relation", relation.as_str())
                    .with("keys", keys.clone());
                if !fields.is_empty() {
                    params.insert("fields", fields.clone());
                }
                self.objects
                    .read_related_objects(&params, &client)
                    .await?
                    .into_records()
            }
        };

        write_records(out, &records)
    }

    /// Build the client from the config file (if any) and the environment
    fn client(&self) -> Result<IntacctClient> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .with_env_overrides();

        IntacctClient::connect(config)
    }

    fn base_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(control_id) = &self.cli.control_id {
            params.insert("control_id", control_id.as_str());
        }
        params
    }
}

fn write_records<W: Write>(out: &mut W, records: &[Record]) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(out, "{line}").context("Failed to write record")?;
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}

//! CLI runner - executes commands

use crate::api::Api;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{RequestOptions, ResponseBody};
use crate::types::{JsonValue, Method};
use futures::StreamExt;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let api = Api::new(self.client_config()?)?;

        match &self.cli.command {
            Commands::Request {
                verb,
                segments,
                params,
                headers,
                body,
            } => {
                let mut options = options_from(params);
                options.headers.extend(headers.iter().cloned());
                if let Some(body) = body {
                    options = options.raw(body.as_str());
                }
                self.request(&api, *verb, segments, options).await
            }
            Commands::All {
                segments,
                pages,
                collection,
                params,
                limit,
                max_elements,
            } => {
                self.all(
                    &api,
                    segments,
                    *pages,
                    collection.as_deref(),
                    options_from(params),
                    *limit,
                    *max_elements,
                )
                .await
            }
        }
    }

    /// Client config from the config file, overridden by flags. The
    /// environment only fills what both leave unset.
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    fn client_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(domain) = &self.cli.domain {
            config.domain = Some(domain.clone());
        }
        if let Some(key) = &self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(url) = &self.cli.base_url {
            config.base_url = Some(url.clone());
        }
        config.raw_data |= self.cli.raw;
        config.debug |= self.cli.verbose;

        Ok(config.fill_from(lookup))
    }

    async fn request(
        &self,
        api: &Api,
        verb: Method,
        segments: &[String],
        options: RequestOptions,
    ) -> Result<()> {
        let response = api.path(segments.iter().cloned()).execute(verb, options).await?;

        match response {
            Some(response) => match &response.body {
                ResponseBody::Json(value) => self.output_value(value),
                ResponseBody::Raw(bytes) => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(bytes)?;
                    stdout.flush()?;
                }
            },
            None => info!(%verb, "Empty response"),
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn all(
        &self,
        api: &Api,
        segments: &[String],
        pages: bool,
        collection: Option<&str>,
        options: RequestOptions,
        limit: Option<usize>,
        max_elements: Option<usize>,
    ) -> Result<()> {
        let builder = api.path(segments.iter().cloned());
        let mut cursor = match (pages, collection) {
            (true, _) => builder.get_all_pages(options)?,
            (false, Some(name)) => builder.get_all_in(name, options)?,
            (false, None) => builder.get_all(options)?,
        };
        if max_elements.is_some() {
            cursor = cursor.with_max_elements(max_elements);
        }

        let mut count = 0usize;
        {
            let stream = cursor.stream().take(limit.unwrap_or(usize::MAX));
            futures::pin_mut!(stream);
            while let Some(element) = stream.next().await {
                self.output_value(&element?);
                count += 1;
            }
        }

        info!(
            count,
            pages = cursor.next_page(),
            exhausted = cursor.is_exhausted(),
            "Finished"
        );
        Ok(())
    }

    fn output_value(&self, value: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

fn options_from(params: &[(String, String)]) -> RequestOptions {
    params
        .iter()
        .fold(RequestOptions::new(), |opts, (k, v)| opts.param(k.as_str(), v.as_str()))
}

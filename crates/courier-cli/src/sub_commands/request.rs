use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use courier::backends::BitreqTransport;
use courier::{Client, Environment, Method, QueryItem, Requestable, Resource};
use futures::StreamExt;
use tokio::sync::oneshot;

/// Calling convention used to dispatch the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Style {
    /// Await the result
    Await,
    /// Receive the result through a callback
    Callback,
    /// Take the result from a one-item stream
    Stream,
}

#[derive(Args)]
pub struct RequestSubCommand {
    /// Request path, starting with '/'
    path: String,
    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    method: Method,
    /// Query parameter as name=value, or a bare name
    #[arg(short, long = "query", value_parser = parse_query)]
    query: Vec<QueryItem>,
    /// Header as name:value
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    header: Vec<(String, String)>,
    /// Request body
    #[arg(short, long)]
    body: Option<String>,
    /// Dispatch style
    #[arg(short, long, value_enum, default_value_t = Style::Await)]
    style: Style,
}

fn parse_query(input: &str) -> Result<QueryItem, String> {
    match input.split_once('=') {
        Some(("", _)) => Err(format!("Missing query name in {}", input)),
        Some((name, value)) => Ok(QueryItem::new(name, value)),
        None if input.is_empty() => Err("Empty query item".to_string()),
        None => Ok(QueryItem::flag(input)),
    }
}

fn parse_header(input: &str) -> Result<(String, String), String> {
    let (name, value) = input
        .split_once(':')
        .ok_or_else(|| format!("Header {} is not name:value", input))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing header name in {}", input));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

pub async fn request(environment: Environment, sub_command_args: &RequestSubCommand) -> Result<()> {
    let mut request = Requestable::new(sub_command_args.path.as_str())
        .with_method(sub_command_args.method)
        .with_parameters(sub_command_args.query.clone());

    for (name, value) in &sub_command_args.header {
        request = request.with_header(name.as_str(), value.as_str());
    }

    if let Some(body) = &sub_command_args.body {
        request = request.with_body(body.clone().into_bytes());
    }

    tracing::debug!("{:?}", request);

    let resource = Resource::<serde_json::Value>::json(request);
    let client = Client::new(environment, BitreqTransport::new());

    let value = match sub_command_args.style {
        Style::Await => client.try_fetch(&resource).await?,
        Style::Callback => {
            let (tx, rx) = oneshot::channel();
            let task = client.submit(&resource, move |result| {
                let _ = tx.send(result);
            });
            if let Some(task) = task {
                task.resume();
            }
            rx.await??
        }
        Style::Stream => client
            .stream(&resource)
            .next()
            .await
            .ok_or_else(|| anyhow!("Stream ended without a result"))??,
    };

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

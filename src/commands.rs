use serde_json::Value;

use crate::{
    cli::{GetArgs, PathArgs, WriteArgs},
    config::resource_url,
    connection::ODataConnection,
    errors::Result,
};

pub async fn run_get(conn: &ODataConnection, base_url: &str, args: &GetArgs) -> Result<()> {
    let url = resource_url(base_url, &args.path)?;
    let params = if args.query.is_empty() {
        None
    } else {
        Some(args.query.as_slice())
    };

    print_response(conn.execute_get(url.as_str(), params).await?)
}

pub async fn run_create(conn: &ODataConnection, base_url: &str, args: &WriteArgs) -> Result<()> {
    let url = resource_url(base_url, &args.path)?;
    let data: Value = serde_json::from_str(&args.data)?;

    print_response(conn.execute_post(url.as_str(), &data, None).await?)
}

pub async fn run_update(conn: &ODataConnection, base_url: &str, args: &WriteArgs) -> Result<()> {
    let url = resource_url(base_url, &args.path)?;
    let data: Value = serde_json::from_str(&args.data)?;

    conn.execute_patch(url.as_str(), &data).await?;
    println!("Updated {}", url);
    Ok(())
}

pub async fn run_delete(conn: &ODataConnection, base_url: &str, args: &PathArgs) -> Result<()> {
    let url = resource_url(base_url, &args.path)?;

    conn.execute_delete(url.as_str()).await?;
    println!("Deleted {}", url);
    Ok(())
}

pub async fn run_probe(conn: &ODataConnection, base_url: &str) -> Result<()> {
    let url = resource_url(base_url, "")?;

    print_response(conn.execute_get(url.as_str(), None).await?)
}

fn print_response(data: Option<Value>) -> Result<()> {
    match data {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("No content"),
    }
    Ok(())
}

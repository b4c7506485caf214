//! Prints the OpenAPI document of murmur-server as JSON.

use anyhow::Result;
use murmur_server::docs::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}

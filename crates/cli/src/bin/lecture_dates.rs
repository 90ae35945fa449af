use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lecture_dates_cli::main_entry().await
}

use cdncache_lib::cli::{load_options, parse_args, run_with_options};
use cdncache_lib::error::CdnCacheError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), CdnCacheError> {
    color_eyre::install()?;

    let args = parse_args();
    let options = load_options(args.overrides)?;
    run_with_options(options).await?;

    Ok(())
}

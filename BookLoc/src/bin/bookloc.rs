fn main() -> anyhow::Result<()> {
    bookloc::cli::run_cli()
}

fn main() -> anyhow::Result<()> {
    cellular_gp::cli::run()
}

fn main() -> anyhow::Result<()> {
    mysql_runner::run()
}

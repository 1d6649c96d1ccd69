fn main() -> anyhow::Result<()> {
    signpad::run()?;
    Ok(())
}

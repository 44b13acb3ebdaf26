pub fn run() -> anyhow::Result<()> {
    println!("printlink {}", env!("CARGO_PKG_VERSION"));
    println!("OctoPrint instance manager");
    Ok(())
}

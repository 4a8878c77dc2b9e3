fn main() -> anyhow::Result<()> {
    padmacro::run()
}

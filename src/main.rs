fn main() -> anyhow::Result<()> {
    modeldirs::run()
}

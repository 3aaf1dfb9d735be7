use cloudsec_auth::authorities::config::AuthoritiesConfig;

fn main() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(AuthoritiesConfig);
    let path = "auth/schema/authorities.json";
    {
        std::fs::create_dir_all("auth/schema")?;
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &schema)?;
    }
    println!("Wrote schema to: {path}");

    Ok(())
}

use anyhow::Result;

use personagen::loader::SchemaLoader;

pub fn list_command(schemas_dir: &str) -> Result<()> {
    let loader = SchemaLoader::new(schemas_dir)?;
    let schemas = loader.list_schemas()?;

    println!("Schemas in {schemas_dir}:");
    if schemas.is_empty() {
        println!("  (none)");
    } else {
        for name in schemas {
            println!("  - {name}");
        }
    }

    Ok(())
}

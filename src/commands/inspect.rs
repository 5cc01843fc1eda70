use anyhow::Result;

use personagen::loader::SchemaLoader;

/// Print the parsed internal model of a schema, after all structural checks.
pub fn inspect_command(schemas_dir: &str, schema_id: &str) -> Result<()> {
    let loader = SchemaLoader::new(schemas_dir)?;
    let schema = loader.load(schema_id)?;

    let taxonomy = loader.load_characteristics()?;
    loader.verify_characteristics(&schema, &taxonomy)?;

    println!("{:#?}", schema.definition);
    Ok(())
}

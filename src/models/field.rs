/// A single schema field: its type, constraints, and generation hints.
///
/// Built once by the schema parser and never re-interpreted afterwards;
/// the validator only ever matches on [`FieldType`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Whether a record must contain this field. Defaults to true.
    pub required: bool,

    /// The type discriminant plus any type-specific constraints.
    pub field_type: FieldType,

    /// Free-text description, used only to enrich generation prompts.
    pub description: Option<String>,

    /// `category.key` references into the characteristics taxonomy.
    /// Opaque to validation; consumed by prompt building.
    pub characteristic_refs: Vec<String>,
}

impl FieldSpec {
    /// A required field of the given type with no constraints or hints.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            required: true,
            field_type,
            description: None,
            characteristic_refs: Vec::new(),
        }
    }

    pub fn optional(field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::new(field_type)
        }
    }
}

/// The five type variants a schema field can declare.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Text, optionally bounded in length (inclusive on both ends) and/or
    /// restricted to a closed set of allowed values.
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        options: Option<Vec<String>>,
    },

    /// Integer or floating-point.
    Number,

    Boolean,

    /// An ordered sequence. When `item_spec` is absent, elements are
    /// unchecked. The parser only retains object-typed item specs; scalar
    /// item declarations are load-checked, then dropped.
    Array { item_spec: Option<Box<FieldSpec>> },

    /// A nested mapping. When `fields` is absent, the object's internals
    /// are not checked.
    Object {
        fields: Option<super::SchemaDefinition>,
    },
}

/// The valid `type` discriminants, in the order they appear in schema docs.
pub const TYPE_NAMES: [&str; 5] = ["string", "number", "boolean", "array", "object"];

impl FieldType {
    /// An unconstrained string type.
    pub fn plain_string() -> Self {
        FieldType::String {
            min_length: None,
            max_length: None,
            options: None,
        }
    }

    /// The discriminant name as it appears in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array { .. } => "array",
            FieldType::Object { .. } => "object",
        }
    }
}

// Declaration table definitions for the subject program

use rustc_hash::FxHashMap;

/// Declared type of a field, variable, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Long,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    Char,
    String,
    Void,
    Other(String), // Any class, generic or array type
}

impl TypeTag {
    /// Map declared type text (`int`, `String`, `List<Integer>`, ...) to a tag
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "int" | "Integer" => TypeTag::Int,
            "long" | "Long" => TypeTag::Long,
            "short" | "Short" => TypeTag::Short,
            "byte" | "Byte" => TypeTag::Byte,
            "double" | "Double" => TypeTag::Double,
            "float" | "Float" => TypeTag::Float,
            "boolean" | "Boolean" => TypeTag::Boolean,
            "char" | "Character" => TypeTag::Char,
            "String" => TypeTag::String,
            "void" => TypeTag::Void,
            other => TypeTag::Other(other.to_string()),
        }
    }

    /// True for the primitive keywords that can start a declaration
    pub fn is_primitive_keyword(word: &str) -> bool {
        matches!(
            word,
            "int" | "long" | "short" | "byte" | "double" | "float" | "boolean" | "char" | "void"
        )
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            TypeTag::Int | TypeTag::Long | TypeTag::Short | TypeTag::Byte
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, TypeTag::Double | TypeTag::Float)
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    #[default]
    Package, // No modifier written
}

impl Visibility {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// A field declared in a class body
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: TypeTag,
    pub visibility: Visibility,
    pub is_static: bool,
    pub initializer: Option<String>, // Expression text, evaluated lazily
    pub line: usize,
}

/// A method declared in a class body or at source level
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub owner: Option<String>, // Declaring class, None for free methods
    pub return_type: TypeTag,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: String, // Raw parameter list text
    pub body: String,   // Body text between the braces
    pub body_line: usize, // Source line on which `body` starts
}

impl MethodDef {
    /// Table key: `Class.method` for members, bare name for free methods
    pub fn key(&self) -> String {
        match &self.owner {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }

    /// Split the parameter list into `(type, name)` pairs
    pub fn param_list(&self) -> Vec<(TypeTag, String)> {
        self.params
            .split(',')
            .filter_map(|p| {
                let p = p.trim().trim_start_matches("final ").trim();
                let (ty, name) = p.rsplit_once(char::is_whitespace)?;
                Some((TypeTag::parse(ty), name.trim().to_string()))
            })
            .collect()
    }
}

/// A class with its members
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDef {
    pub name: String,
    pub parent: Option<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Insert or replace a field (last declaration wins)
    pub fn put_field(&mut self, field: FieldDef) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Insert or replace a method (last declaration wins)
    pub fn put_method(&mut self, method: MethodDef) {
        match self.methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => self.methods.push(method),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Everything the declaration extractor found
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    /// Class name -> definition
    pub classes: FxHashMap<String, ClassDef>,
    /// `Class.method` or free method name -> definition
    pub methods: FxHashMap<String, MethodDef>,
}

impl Declarations {
    pub fn free_method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(name).filter(|m| m.owner.is_none())
    }
}

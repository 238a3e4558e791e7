use std::collections::HashMap;

use super::signature::{FuncSig, ResultSignature};
use super::types::Type;

/// Resolves names to what the classifier needs to know about them.
pub trait SignatureLookup {
    fn lookup_function(&self, name: &str) -> Option<&FuncSig>;

    /// Type of a variable in scope. Tables that only hold signatures know no variables.
    fn lookup_variable(&self, _name: &str) -> Option<&Type> {
        None
    }
}

/// Callable declarations, keyed by name. Filled once before any checking
/// starts and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    functions: HashMap<String, FuncSig>,
    builtins: Vec<String>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table seeded with the builtin functions of the fixture language.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.insert_builtin("print", FuncSig::new(Vec::new(), ResultSignature::void()));
        table.insert_builtin("println", FuncSig::new(Vec::new(), ResultSignature::void()));
        table.insert_builtin("len", FuncSig::new(Vec::new(), ResultSignature::single(Type::Int)));
        table
    }

    fn insert_builtin(&mut self, name: &str, sig: FuncSig) {
        self.functions.insert(name.to_string(), sig);
        self.builtins.push(name.to_string());
    }

    /// Declares `name`. A user declaration replaces a builtin of the same
    /// name; otherwise the first declaration wins and `false` is returned.
    pub fn declare(&mut self, name: &str, sig: FuncSig) -> bool {
        if self.functions.contains_key(name) && !self.is_builtin(name) {
            return false;
        }
        self.builtins.retain(|b| b != name);
        self.functions.insert(name.to_string(), sig);
        true
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.iter().any(|b| b == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl SignatureLookup for SignatureTable {
    fn lookup_function(&self, name: &str) -> Option<&FuncSig> {
        self.functions.get(name)
    }
}

/// Lexical scopes over a shared signature table. Each checking worker owns one.
#[derive(Debug)]
pub struct TypeEnv<'a> {
    signatures: &'a SignatureTable,
    scopes: Vec<HashMap<String, Type>>,
}

impl<'a> TypeEnv<'a> {
    pub fn new(signatures: &'a SignatureTable) -> Self {
        Self { signatures, scopes: vec![HashMap::new()] }
    }

    /// Starts from an existing package scope, e.g. the checked globals.
    pub fn with_globals(signatures: &'a SignatureTable, globals: HashMap<String, Type>) -> Self {
        Self { signatures, scopes: vec![globals] }
    }

    pub fn signatures(&self) -> &'a SignatureTable {
        self.signatures
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// `_` is never bound.
    pub fn define(&mut self, name: &str, ty: Type) {
        if name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    /// The outermost scope, consumed.
    pub fn into_package_scope(mut self) -> HashMap<String, Type> {
        self.scopes.truncate(1);
        self.scopes.pop().unwrap_or_default()
    }
}

impl SignatureLookup for TypeEnv<'_> {
    fn lookup_function(&self, name: &str) -> Option<&FuncSig> {
        self.signatures.lookup_function(name)
    }

    fn lookup_variable(&self, name: &str) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

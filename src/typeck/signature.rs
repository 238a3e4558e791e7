use super::types::Type;

/// The ordered result types a callable produces. Fixed once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSignature {
    results: Vec<Type>,
}

impl ResultSignature {
    pub fn new(results: Vec<Type>) -> Self {
        Self { results }
    }

    pub fn void() -> Self {
        Self { results: Vec::new() }
    }

    pub fn single(ty: Type) -> Self {
        Self { results: vec![ty] }
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// `None` when `index >= result_count()`.
    pub fn result_type_at(&self, index: usize) -> Option<&Type> {
        self.results.get(index)
    }

    pub fn results(&self) -> &[Type] {
        &self.results
    }

    pub fn is_void(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSig {
    pub params: Vec<Type>,
    pub results: ResultSignature,
}

impl FuncSig {
    pub fn new(params: Vec<Type>, results: ResultSignature) -> Self {
        Self { params, results }
    }
}

use once_cell::sync::OnceCell;
use retrieve_api::TypeName;
use smol_str::SmolStr;
use std::fmt;

/// One entry of a module's analyzer output.
///
/// A record without a member designates the type itself; with a member it
/// designates every member of that name. `marker` is the annotation type the
/// analyzer saw on the declaration, when it reported one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub type_name: TypeName,
    pub member: Option<SmolStr>,
    pub marker: Option<TypeName>,
}

impl Record {
    pub fn ty(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            member: None,
            marker: None,
        }
    }

    pub fn member(type_name: impl Into<TypeName>, member: impl AsRef<str>) -> Self {
        Self {
            type_name: type_name.into(),
            member: Some(SmolStr::new(member.as_ref())),
            marker: None,
        }
    }

    pub fn marked_with(mut self, marker: impl Into<TypeName>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn has_member(&self) -> bool {
        self.member.is_some()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if let Some(member) = &self.member {
            write!(f, "::{}", member)?;
        }
        if let Some(marker) = &self.marker {
            write!(f, " [{}]", marker)?;
        }
        Ok(())
    }
}

type RecordGenerator = dyn Fn() -> Vec<Record> + Send + Sync;

/// Lazily initialized, stable record collection of one module.
pub struct RecordTable {
    cell: OnceCell<Vec<Record>>,
    generator: Box<RecordGenerator>,
}

impl RecordTable {
    pub fn eager(records: Vec<Record>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(records);
        Self {
            cell,
            generator: Box::new(Vec::<Record>::new),
        }
    }

    pub fn lazy<F>(generator: F) -> Self
    where
        F: Fn() -> Vec<Record> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            generator: Box::new(generator),
        }
    }

    /// The records, generating them on first access.
    pub fn get(&self) -> &[Record] {
        self.cell.get_or_init(|| (self.generator)())
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::eager(Vec::new())
    }
}

impl fmt::Debug for RecordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTable")
            .field("records", &self.cell.get())
            .finish()
    }
}

//! Fixed registry of displayable event attributes.
//!
//! The registry is the only source of storage field names that ever reach
//! query text. Request input selects columns by flag, never by field name.

/// Symbolic identifier for every column the browser knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Timestamp,
    Id,
    Name,
    Description,
    Source,
    Severity,
}

/// A displayable attribute of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    /// Display label, unique across the registry.
    pub name: &'static str,
    /// Backing column in the `events` table.
    pub storage_field: &'static str,
    pub show_by_default: bool,
}

/// Prefix of the boolean request flag that turns an optional column on.
pub const COLUMN_FLAG_PREFIX: &str = "show-";

/// Value a column flag must carry to count as set.
pub const COLUMN_FLAG_ON: &str = "on";

static COLUMNS: [Column; 6] = [
    Column {
        id: ColumnId::Timestamp,
        name: "Timestamp",
        storage_field: "timestamp",
        show_by_default: true,
    },
    Column {
        id: ColumnId::Id,
        name: "ID",
        storage_field: "id",
        show_by_default: true,
    },
    Column {
        id: ColumnId::Name,
        name: "Name",
        storage_field: "name",
        show_by_default: true,
    },
    Column {
        id: ColumnId::Description,
        name: "Description",
        storage_field: "description",
        show_by_default: false,
    },
    Column {
        id: ColumnId::Source,
        name: "Source",
        storage_field: "source",
        show_by_default: false,
    },
    Column {
        id: ColumnId::Severity,
        name: "Severity",
        storage_field: "severity",
        show_by_default: false,
    },
];

impl Column {
    /// Name of the request flag that selects this column, e.g. `show-description`.
    pub fn flag_name(&self) -> String {
        format!("{COLUMN_FLAG_PREFIX}{}", self.name.to_lowercase())
    }

    /// Position of the column in the registry.
    fn position(&self) -> usize {
        COLUMNS
            .iter()
            .position(|candidate| candidate.id == self.id)
            .unwrap_or(usize::MAX)
    }
}

/// All columns, in registry order.
pub fn all_columns() -> &'static [Column] {
    &COLUMNS
}

/// Columns shown by default, in registry order.
pub fn default_columns() -> impl Iterator<Item = &'static Column> {
    COLUMNS.iter().filter(|column| column.show_by_default)
}

/// Looks a column up by its display name.
pub fn lookup(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|column| column.name == name)
}

/// Looks a column up by its identifier.
pub fn column(id: ColumnId) -> &'static Column {
    // Every ColumnId variant has exactly one registry entry.
    match COLUMNS.iter().find(|column| column.id == id) {
        Some(column) => column,
        None => unreachable!("column {id:?} missing from registry"),
    }
}

/// Ordered, de-duplicated set of columns to project and render.
///
/// Always contains every default column and is always in registry order,
/// whatever order the columns were added in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    columns: Vec<&'static Column>,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self {
            columns: default_columns().collect(),
        }
    }
}

impl ColumnSelection {
    /// Default columns plus the given extra columns.
    pub fn with_optional<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = ColumnId>,
    {
        let mut selection = Self::default();
        for id in extra {
            selection.insert(column(id));
        }
        selection
    }

    fn insert(&mut self, column: &'static Column) {
        if self.contains(column.id) {
            return;
        }
        let position = column.position();
        let at = self
            .columns
            .iter()
            .position(|existing| existing.position() > position)
            .unwrap_or(self.columns.len());
        self.columns.insert(at, column);
    }

    pub fn contains(&self, id: ColumnId) -> bool {
        self.columns.iter().any(|column| column.id == id)
    }

    pub fn columns(&self) -> &[&'static Column] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.columns.iter().copied()
    }

    /// Selected columns that are not shown by default.
    pub fn optional(&self) -> impl Iterator<Item = &'static Column> + '_ {
        self.iter().filter(|column| !column.show_by_default)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// A selection always holds the default columns, so this is false in practice.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

use crate::domain::model::CatalogEntry;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, TrackerError};

/// Names of the two catalog columns the tracker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumns {
    pub identifier: String,
    pub description: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            identifier: "codigo_barras".to_string(),
            description: "descricao".to_string(),
        }
    }
}

/// Read-only product table, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parses a delimited export of the product spreadsheet. The first row
    /// must be a header naming both required columns; other columns are
    /// ignored and cells are kept as text.
    pub fn from_delimited(data: &[u8], delimiter: u8, columns: &CatalogColumns) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_cell).collect();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TrackerError::CatalogError {
                    message: format!(
                        "required column '{}' not found (columns: {})",
                        name,
                        headers.join(", ")
                    ),
                })
        };
        let identifier_idx = column_index(&columns.identifier)?;
        let description_idx = column_index(&columns.description)?;

        let mut entries = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            let identifier = decode_cell(record.get(identifier_idx).unwrap_or_default());
            let description = decode_cell(record.get(description_idx).unwrap_or_default());
            let (identifier, description) = (identifier.trim(), description.trim());

            if identifier.is_empty() && description.is_empty() {
                continue;
            }

            entries.push(CatalogEntry {
                identifier: identifier.to_string(),
                description: description.to_string(),
            });
        }

        tracing::debug!("Parsed {} catalog entries", entries.len());
        Ok(Self { entries })
    }

    /// First entry, in catalog order, whose identifier contains `query`
    /// (case-sensitive) or whose description contains it ignoring case.
    pub fn lookup(&self, query: &str) -> Option<&CatalogEntry> {
        if query.is_empty() {
            return None;
        }

        let lowered = query.to_lowercase();
        self.entries.iter().find(|entry| {
            entry.identifier.contains(query) || entry.description.to_lowercase().contains(&lowered)
        })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spreadsheet exports are UTF-8 or Latin-1; a cell that is not valid UTF-8
/// is read as Latin-1.
fn decode_cell(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Delimiter for a catalog file: tab for `.tsv`, comma otherwise.
pub fn delimiter_for(path: &str) -> u8 {
    let is_tsv = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

pub async fn load_catalog<S: Storage>(
    storage: &S,
    path: &str,
    columns: &CatalogColumns,
) -> Result<Catalog> {
    tracing::info!("Loading catalog from {}", storage.location(path));
    let data = storage.read_file(path).await?;
    let catalog = Catalog::from_delimited(&data, delimiter_for(path), columns)?;
    tracing::info!("Catalog loaded with {} products", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let csv = "codigo_barras,descricao,preco\n\
                   123,Milk,4.50\n\
                   7891000100103,Chocolate Milk,6.20\n\
                   456,Bread,3.00\n";
        Catalog::from_delimited(csv.as_bytes(), b',', &CatalogColumns::default()).unwrap()
    }

    #[test]
    fn test_lookup_description_ignores_case() {
        let catalog = sample();
        let found = catalog.lookup("milk").unwrap();
        assert_eq!(found.identifier, "123");
        assert_eq!(found.description, "Milk");
    }

    #[test]
    fn test_lookup_returns_first_in_catalog_order() {
        let catalog = sample();
        // Both milk rows match; the first one wins.
        assert_eq!(catalog.lookup("MILK").unwrap().identifier, "123");
        assert_eq!(catalog.lookup("Choc").unwrap().identifier, "7891000100103");
    }

    #[test]
    fn test_lookup_identifier_substring() {
        let catalog = sample();
        assert_eq!(catalog.lookup("1001").unwrap().description, "Chocolate Milk");
        assert_eq!(catalog.lookup("45").unwrap().description, "Bread");
    }

    #[test]
    fn test_lookup_identifier_is_case_sensitive() {
        let catalog = Catalog::new(vec![CatalogEntry {
            identifier: "AB-10".to_string(),
            description: "Soap".to_string(),
        }]);
        assert!(catalog.lookup("AB").is_some());
        assert!(catalog.lookup("ab").is_none());
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = sample();
        assert!(catalog.lookup("999").is_none());
        assert!(catalog.lookup("").is_none());
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "code,descricao\n1,Milk\n";
        let err = Catalog::from_delimited(csv.as_bytes(), b',', &CatalogColumns::default())
            .unwrap_err();
        assert!(matches!(err, TrackerError::CatalogError { .. }));
        assert!(err.to_string().contains("codigo_barras"));
    }

    #[test]
    fn test_tab_delimited_and_blank_rows() {
        let tsv = "descricao\tcodigo_barras\nYogurt\t789\n\t\nButter\t321\n";
        let catalog =
            Catalog::from_delimited(tsv.as_bytes(), b'\t', &CatalogColumns::default()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[1].identifier, "321");
    }

    #[test]
    fn test_latin1_cells_are_decoded() {
        let data = b"codigo_barras,descricao\n123,P\xE3o de Forma\n456,Leite\n";
        let catalog = Catalog::from_delimited(data, b',', &CatalogColumns::default()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].description, "P\u{e3}o de Forma");
        assert_eq!(catalog.lookup("PÃO").unwrap().identifier, "123");
        assert_eq!(catalog.lookup("leite").unwrap().identifier, "456");
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for("products.tsv"), b'\t');
        assert_eq!(delimiter_for("products.TSV"), b'\t');
        assert_eq!(delimiter_for("products.csv"), b',');
    }
}

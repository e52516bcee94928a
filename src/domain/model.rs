use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

pub const CATALOG_ID: &str = "Catalog ID";
pub const CATALOG_NUMBER: &str = "Catalog Number";
pub const SPECIES_COLUMNS: [&str; 5] = [
    "Species 1",
    "Species 2",
    "Species 3",
    "Species 4",
    "Species 5",
];
pub const PLACEHOLDER: &str = "—";

/// 目錄編號；0 與負數也是合法編號
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub i64);

impl CatalogId {
    /// Accepts any cell that reads as a finite number and truncates it to its
    /// leading integer, so `"12"`, `" 12 "` and `"12.0"` all yield 12.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
            return None;
        }
        parse_int_prefix(trimmed).map(CatalogId)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leading-integer parse: optional sign followed by digits, rest ignored.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| v * sign)
}

/// Leading-float parse: `"12.5abc"` → 12.5, `"abc"` → None.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = FLOAT_PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
    });
    re.find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateStatus {
    Valid(Coordinate),
    Invalid,
    Missing,
}

impl CoordinateStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|s| s.contains(',')) else {
            return CoordinateStatus::Missing;
        };
        let mut parts = raw.split(',');
        let lat = parts.next().and_then(parse_float_prefix);
        let lng = parts.next().and_then(parse_float_prefix);
        match (lat, lng) {
            (Some(lat), Some(lng)) => CoordinateStatus::Valid(Coordinate { lat, lng }),
            _ => CoordinateStatus::Invalid,
        }
    }

    pub fn valid(&self) -> Option<Coordinate> {
        match self {
            CoordinateStatus::Valid(c) => Some(*c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub id: CatalogId,
    pub fields: HashMap<String, String>,
}

impl Specimen {
    pub fn new(id: CatalogId, fields: HashMap<String, String>) -> Self {
        Self { id, fields }
    }

    /// Trimmed, non-empty value of a column.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Column value or the dash placeholder.
    pub fn display(&self, column: &str) -> &str {
        self.field(column).unwrap_or(PLACEHOLDER)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("Specimen Title")
    }

    pub fn species(&self) -> Vec<&str> {
        SPECIES_COLUMNS
            .iter()
            .filter_map(|column| self.field(column))
            .collect()
    }

    pub fn species_joined(&self) -> String {
        self.species().join(", ")
    }

    pub fn species_info_links(&self) -> Vec<&str> {
        self.field("Species Info")
            .map(|info| {
                info.split_whitespace()
                    .filter(|token| token.starts_with("http"))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn locality(&self) -> Option<&str> {
        self.field("Locality")
    }

    pub fn mindat_locality(&self) -> Option<&str> {
        self.field("Mindat Locality")
    }

    pub fn source(&self) -> Option<&str> {
        self.field("Specimen Source")
    }

    pub fn description(&self) -> Option<&str> {
        self.field("Description")
    }

    pub fn coordinates(&self) -> CoordinateStatus {
        CoordinateStatus::parse(self.field("Coordinates"))
    }

    /// 年份欄位優先，否則從取得日期推算
    pub fn year_acquired(&self) -> Option<String> {
        if let Some(year) = self.field("Year of Acquisition") {
            return Some(year.to_string());
        }
        let date = self.field("Acquisition Date")?;
        use chrono::Datelike;
        ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"]
            .iter()
            .find_map(|fmt| chrono::NaiveDate::parse_from_str(date, fmt).ok())
            .map(|d| d.year().to_string())
            .or_else(|| Some(date.to_string()))
    }

    /// `Photos` column when it holds a count.
    pub fn photo_count(&self) -> Option<u32> {
        let raw = self.field("Photos")?;
        if !raw.parse::<f64>().is_ok_and(f64::is_finite) {
            return None;
        }
        parse_int_prefix(raw).and_then(|v| u32::try_from(v).ok())
    }

    /// Title, else species list, else the given fallback.
    pub fn label_or(&self, fallback: &str) -> String {
        if let Some(title) = self.title() {
            return title.to_string();
        }
        let species = self.species_joined();
        if species.is_empty() {
            fallback.to_string()
        } else {
            species
        }
    }

    /// Lowercase `"{id} {title} {species}"`, the haystack for substring search.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.id,
            self.title().unwrap_or_default(),
            self.species_joined()
        )
        .to_lowercase()
    }
}

pub type Collection = BTreeMap<CatalogId, Specimen>;

/// 照片表：編號 → 依序的檔名或雲端檔案 ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoManifest {
    pub entries: BTreeMap<CatalogId, Vec<String>>,
}

impl PhotoManifest {
    pub fn get(&self, id: CatalogId) -> Option<&[String]> {
        self.entries
            .get(&id)
            .map(Vec::as_slice)
            .filter(|files| !files.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// extract 階段的產出
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub collection: Collection,
    pub manifest: PhotoManifest,
}

/// 一個待寫出的網站檔案，路徑相對於輸出目錄
#[derive(Debug, Clone, PartialEq)]
pub struct SiteFile {
    pub path: String,
    pub contents: Vec<u8>,
}

impl SiteFile {
    pub fn text(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into().into_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderedSite {
    pub files: Vec<SiteFile>,
    pub specimen_count: usize,
}

impl RenderedSite {
    pub fn file(&self, path: &str) -> Option<&SiteFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

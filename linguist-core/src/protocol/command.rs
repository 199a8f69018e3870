#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    CatalogLoad,
    CatalogLoadDir,
    CatalogResolve,
    CatalogUnload,
    CatalogList,
    CatalogStats,
    CatalogQa,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "catalog.load" => Command::CatalogLoad,
            "catalog.load_dir" => Command::CatalogLoadDir,
            "catalog.resolve" => Command::CatalogResolve,
            "catalog.unload" => Command::CatalogUnload,
            "catalog.list" => Command::CatalogList,
            "catalog.stats" => Command::CatalogStats,
            "catalog.qa" => Command::CatalogQa,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}

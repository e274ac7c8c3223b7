//! Container header layouts.
//!
//! Each content kind has its own header schema; nothing is shared across
//! layouts except the integer encoding. Field order below is the on-disk
//! order.

/// Magic of parts and custom-objects containers.
pub const PACK_MAGIC: [u8; 4] = *b"knco";

/// Magic of garage containers, written as a little-endian `i32`.
pub const GARAGE_MAGIC: i32 = 0x00DE_DEDE;

/// Banner that opens every map container, written as a length-prefixed string.
pub const MAP_BANNER: &str = concat!(
    " _   _______   \n",
    "| | / /_   _\\  \n",
    "| |/ /  | |    \n",
    "|    \\  | |    \n",
    "| |\\  \\_| |_   \n",
    "\\_| \\_/\\___/   \n",
    " _   _ _____   \n",
    "| \\ | |  _  |  \n",
    "|  \\| | | | |  \n",
    "| . ` | | | |  \n",
    "| |\\  \\ \\_/ /  \n",
    "\\_| \\_/\\___/   ",
);

/// Value of the reserved header slot in garage and map containers.
pub const RESERVED: i32 = 0;

/// Which layout a container uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Parts packs and custom-objects packs.
    Pack,
    Garage,
    Map,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Layout::Pack => "pack",
            Layout::Garage => "garage",
            Layout::Map => "map",
        })
    }
}

/// Header of a parts or custom-objects container.
///
/// `magic | tool_format_version | content_version | kind | content_id |
/// author_steam_id | author_discord_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackHeader {
    pub tool_format_version: i32,
    pub content_version: i32,
    /// Pack category: the part type of a parts pack or the objects type
    /// of a custom-objects pack.
    pub kind: i32,
    pub content_id: u64,
    pub author_steam_id: u64,
    pub author_discord_id: u64,
}

/// Header of a garage container.
///
/// `magic | proxy_json | tool_format_version | content_id | content_name |
/// author_name | reserved`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarageHeader {
    /// Compact JSON proxy metadata of the garage.
    pub proxy_json: String,
    pub tool_format_version: i32,
    pub content_id: u64,
    pub content_name: String,
    pub author_name: String,
}

/// Header of a map container.
///
/// `banner | tool_format_version | content_id | content_name | author_name |
/// reserved | loadscreen_len | loadscreen`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    pub tool_format_version: i32,
    pub content_id: u64,
    pub content_name: String,
    pub author_name: String,
    /// Raw load-screen image file (PNG or JPEG).
    pub loadscreen: Vec<u8>,
}

/// A header of any layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerHeader {
    Pack(PackHeader),
    Garage(GarageHeader),
    Map(MapHeader),
}

impl ContainerHeader {
    #[must_use]
    pub fn layout(&self) -> Layout {
        match self {
            ContainerHeader::Pack(_) => Layout::Pack,
            ContainerHeader::Garage(_) => Layout::Garage,
            ContainerHeader::Map(_) => Layout::Map,
        }
    }

    #[must_use]
    pub fn content_id(&self) -> u64 {
        match self {
            ContainerHeader::Pack(h) => h.content_id,
            ContainerHeader::Garage(h) => h.content_id,
            ContainerHeader::Map(h) => h.content_id,
        }
    }

    #[must_use]
    pub fn tool_format_version(&self) -> i32 {
        match self {
            ContainerHeader::Pack(h) => h.tool_format_version,
            ContainerHeader::Garage(h) => h.tool_format_version,
            ContainerHeader::Map(h) => h.tool_format_version,
        }
    }
}

impl From<PackHeader> for ContainerHeader {
    fn from(header: PackHeader) -> Self {
        ContainerHeader::Pack(header)
    }
}

impl From<GarageHeader> for ContainerHeader {
    fn from(header: GarageHeader) -> Self {
        ContainerHeader::Garage(header)
    }
}

impl From<MapHeader> for ContainerHeader {
    fn from(header: MapHeader) -> Self {
        ContainerHeader::Map(header)
    }
}

use serde::{Deserialize, Serialize};

pub mod directory;
pub mod mime;
pub mod rational;
pub mod records;
pub mod tags;
pub mod xmp;

pub use directory::{Charset, Directory, DirectoryKind, PngTextPair, Tag, TagValue};
pub use rational::Rational;
pub use records::{
    CatalogRecord, DirectoryMap, DisplayMap, IptcDataSet, OverlayRecord, PageInfo, PanoramaInfo,
};
pub use xmp::{XmpMeta, XmpProperty};

bitflags::bitflags! {
    /// Format-specific properties accumulated while cataloging an item.
    ///
    /// Bits are only ever OR-ed in; nothing clears them once set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MetadataFlags: u8 {
        const ANIMATED  = 0b0000_0001;
        const FLIPPED   = 0b0000_0010;
        const GEOTIFF   = 0b0000_0100;
        const SPHERICAL = 0b0000_1000;
        const MULTIPAGE = 0b0001_0000;
    }
}

/// Display keys that are not backend directory names.
pub mod names {
    pub const PNG_TEXTUAL_DATA: &str = "PNG Textual Data";
    pub const GEOTIFF: &str = "GeoTIFF";
    pub const XMP: &str = "XMP";
    pub const MEDIA: &str = "media";
    pub const COVER: &str = "cover";
    pub const SPHERICAL_VIDEO: &str = "Spherical Video";
    pub const QUICKTIME_USER_MEDIA: &str = "QuickTime User Media";

    pub const PNG_ITXT: &str = "PNG-iTXt";
    pub const PNG_TEXT: &str = "PNG-tEXt";
    pub const PNG_ZTXT: &str = "PNG-zTXt";
    pub const PNG_TIME: &str = "PNG-tIME";
}

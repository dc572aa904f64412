//! Tag identifiers the engine reads, grouped by directory kind.

pub mod exif {
    pub const ORIENTATION: u32 = 0x0112;
    pub const DATETIME: u32 = 0x0132;
    pub const EXPOSURE_TIME: u32 = 0x829a;
    pub const FNUMBER: u32 = 0x829d;
    pub const ISO_EQUIVALENT: u32 = 0x8827;
    pub const DATETIME_ORIGINAL: u32 = 0x9003;
    pub const DATETIME_DIGITIZED: u32 = 0x9004;
    pub const FOCAL_LENGTH: u32 = 0x920a;
}

pub mod gps {
    pub const LATITUDE_REF: u32 = 0x0001;
    pub const LATITUDE: u32 = 0x0002;
    pub const LONGITUDE_REF: u32 = 0x0003;
    pub const LONGITUDE: u32 = 0x0004;
    pub const TIME_STAMP: u32 = 0x0007;
    pub const DATE_STAMP: u32 = 0x001d;
}

pub mod geotiff {
    pub const MODEL_PIXEL_SCALE: u32 = 33550;
    pub const MODEL_TIEPOINT: u32 = 33922;
    pub const MODEL_TRANSFORMATION: u32 = 34264;
    pub const GEO_KEY_DIRECTORY: u32 = 34735;
    pub const GEO_DOUBLE_PARAMS: u32 = 34736;
    pub const GEO_ASCII_PARAMS: u32 = 34737;
}

pub mod file_type {
    pub const DETECTED_MIME_TYPE: u32 = 3;
}

pub mod png {
    pub const TEXTUAL_DATA: u32 = 13;
    pub const LAST_MODIFICATION_TIME: u32 = 14;
}

pub mod webp {
    pub const IS_ANIMATION: u32 = 5;
}

pub mod iptc {
    pub const KEYWORDS: u32 = 0x0219;
}

pub mod xmp {
    pub const VALUE_COUNT: u32 = 0xffff;
}

use serde_json::{Map, Value};

/// A category hash: field name to loosely typed value.
pub type CategoryRecord = Map<String, Value>;

/// Fields stored as strings but served as integers.
pub const INT_FIELDS: &[&str] = &[
    "cid",
    "parentCid",
    "disabled",
    "isSection",
    "order",
    "topic_count",
    "post_count",
    "numRecentReplies",
    "minTags",
    "maxTags",
    "postQueue",
    "subCategoriesPerPage",
];

/// Free-text display fields escaped whenever they are present.
pub const ESCAPE_FIELDS: &[&str] = &["name", "color", "bgColor", "backgroundImage", "imageClass", "class", "link"];

/// Integer fields that fall back to a site setting: (field, setting key).
pub const DEFAULTED_INT_FIELDS: &[(&str, &str)] = &[
    ("minTags", "minimumTagsPerTopic"),
    ("maxTags", "maximumTagsPerTopic"),
    ("postQueue", "postQueue"),
];

/// Shown in place of an empty `icon`.
pub const DEFAULT_ICON: &str = "hidden";

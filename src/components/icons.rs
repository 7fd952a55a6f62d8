//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuExternalLink as ExternalLink, LuPencil as Edit, LuPlug as Connect,
        LuRefreshCw as Refresh, LuSearch as Search, LuStar as Star, LuStar as StarFilled,
        LuTrash2 as Trash, LuUnplug as Disconnect, LuUser as User, LuWallet as Wallet,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowClockwise as Refresh, BsBoxArrowUpRight as ExternalLink, BsPencil as Edit,
        BsPerson as User, BsPlug as Connect, BsSearch as Search, BsStar as Star,
        BsStarFill as StarFilled, BsTrash as Trash, BsWallet2 as Wallet, BsXLg as Disconnect,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(WALLET, Wallet);
themed_icon!(CONNECT, Connect);
themed_icon!(DISCONNECT, Disconnect);
themed_icon!(REFRESH, Refresh);
themed_icon!(SEARCH, Search);
themed_icon!(STAR, Star);
themed_icon!(STAR_FILLED, StarFilled);
themed_icon!(USER, User);
themed_icon!(EDIT, Edit);
themed_icon!(TRASH, Trash);
themed_icon!(EXTERNAL_LINK, ExternalLink);

//! Fixed REST paths, relative to the configured base URL

/// `base/id`
pub fn item(base: &str, id: &str) -> String {
    format!("{}/{}", base, urlencoding::encode(id))
}

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
    pub const CURRENT_USER: &str = "/auth/user/me";
}

pub mod institution {
    pub const BASE: &str = "/institution";
    pub const EXPORT_XLSX: &str = "/institution/export/xlsx";
    pub const IMPORT_XLSX: &str = "/institution/import/xlsx";

    pub fn courses(id: &str) -> String {
        format!("{}/{}/courses", BASE, urlencoding::encode(id))
    }

    pub fn course(id: &str, index: usize) -> String {
        format!("{}/{}", courses(id), index)
    }
}

pub mod insurance {
    pub const BASE: &str = "/insurance";
}

pub mod visa {
    pub const BASE: &str = "/visa";
}

pub mod skill_assessment {
    pub const BASE: &str = "/skill-assessment";
    pub const OCCUPATION_GROUPS: &str = "/skill-assessment/occupation-groups";
    pub const PATHWAYS_STREAMS: &str = "/skill-assessment/pathways-streams";
}

pub mod accommodation {
    pub const BASE: &str = "/accommodation";
}

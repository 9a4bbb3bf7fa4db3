//! Declarative route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! One row per navigable route: path, title, and required-role set. The
//! router, the route guard, and the sidebar menu all read this table, so the
//! menu can never offer a link the guard would refuse.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::Role;

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Rendered without a session.
    Public,
    /// Requires a session; an empty role set admits any authenticated role.
    Protected(&'static [Role]),
}

impl Access {
    /// Whether an identity holding `role` may enter.
    pub fn admits(self, role: Role) -> bool {
        match self {
            Self::Public => true,
            Self::Protected(roles) => roles.is_empty() || roles.contains(&role),
        }
    }
}

const ANY_ROLE: &[Role] = &[];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const TEACHER_ONLY: &[Role] = &[Role::Teacher];
const STAFF: &[Role] = &[Role::Admin, Role::Teacher];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Login,
    Unauthorized,
    Home,
    Dashboard,
    Users,
    Courses,
    Subjects,
    Students,
    Assignments,
    MyCourses,
    RecordAttendance,
    RecordGrades,
    Reports,
}

/// Order in which role-restricted routes appear in the sidebar.
const MENU_ORDER: [AppRoute; 9] = [
    AppRoute::Users,
    AppRoute::Courses,
    AppRoute::Subjects,
    AppRoute::Students,
    AppRoute::Assignments,
    AppRoute::MyCourses,
    AppRoute::RecordAttendance,
    AppRoute::RecordGrades,
    AppRoute::Reports,
];

impl AppRoute {
    pub const ALL: [AppRoute; 13] = [
        AppRoute::Login,
        AppRoute::Unauthorized,
        AppRoute::Home,
        AppRoute::Dashboard,
        AppRoute::Users,
        AppRoute::Courses,
        AppRoute::Subjects,
        AppRoute::Students,
        AppRoute::Assignments,
        AppRoute::MyCourses,
        AppRoute::RecordAttendance,
        AppRoute::RecordGrades,
        AppRoute::Reports,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Unauthorized => "/unauthorized",
            Self::Home => "/",
            Self::Dashboard => "/dashboard",
            Self::Users => "/usuarios",
            Self::Courses => "/cursos",
            Self::Subjects => "/materias",
            Self::Students => "/estudiantes",
            Self::Assignments => "/asignaciones",
            Self::MyCourses => "/mis-cursos",
            Self::RecordAttendance => "/registrar-asistencia",
            Self::RecordGrades => "/registrar-notas",
            Self::Reports => "/reportes",
        }
    }

    /// Path without the leading slash, as the router segment.
    pub fn segment(self) -> &'static str {
        self.path().trim_start_matches('/')
    }

    pub const fn access(self) -> Access {
        match self {
            Self::Login | Self::Unauthorized => Access::Public,
            Self::Home | Self::Dashboard => Access::Protected(ANY_ROLE),
            Self::Users | Self::Courses | Self::Subjects | Self::Students | Self::Assignments => {
                Access::Protected(ADMIN_ONLY)
            }
            Self::MyCourses | Self::RecordAttendance | Self::RecordGrades => Access::Protected(TEACHER_ONLY),
            Self::Reports => Access::Protected(STAFF),
        }
    }

    /// Required-role set for protected routes; empty for public ones.
    pub const fn required_roles(self) -> &'static [Role] {
        match self.access() {
            Access::Public => ANY_ROLE,
            Access::Protected(roles) => roles,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Iniciar sesión",
            Self::Unauthorized => "Acceso denegado",
            Self::Home | Self::Dashboard => "Dashboard",
            Self::Users => "Usuarios",
            Self::Courses => "Cursos",
            Self::Subjects => "Materias",
            Self::Students => "Estudiantes",
            Self::Assignments => "Asignaciones",
            Self::MyCourses => "Mis Cursos",
            Self::RecordAttendance => "Registrar Asistencia",
            Self::RecordGrades => "Registrar Notas",
            Self::Reports => "Reportes",
        }
    }

    /// Resolve a location (path with optional query/fragment) to a route.
    pub fn from_path(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn is_protected(self) -> bool {
        matches!(self.access(), Access::Protected(_))
    }
}

/// Where a freshly authenticated user lands by default.
pub const DEFAULT_AUTHENTICATED: AppRoute = AppRoute::Dashboard;

/// Sidebar entries for a role, in menu order.
pub fn menu_for(role: Role) -> Vec<AppRoute> {
    MENU_ORDER.into_iter().filter(|route| route.access().admits(role)).collect()
}

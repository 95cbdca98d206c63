//! Platform resources: one `EntityApi` per resource path plus the registry their
//! relation columns resolve against.

pub mod models;
pub mod schemas;
pub mod seed;

pub use models::*;

use crate::codec::Filter;
use crate::error::ConfigError;
use crate::http::HttpClient;
use crate::schema::{resolve, ResolvedSchema};
use crate::service::adapters::ScopedApi;
use crate::service::{ApiRegistry, EntityApi};
use std::sync::Arc;

pub type UserApi = EntityApi<User, UserFilter, CreateUserRequest, UpdateUserRequest>;
pub type RoleApi = EntityApi<Role, Filter, RoleRequest, RoleRequest>;
pub type PermissionApi = EntityApi<Permission, Filter, PermissionRequest, PermissionRequest>;
pub type DepartmentApi = EntityApi<Department, Filter, DepartmentRequest, DepartmentRequest>;
pub type CourseApi = EntityApi<Course, Filter, CourseRequest, CourseRequest>;

pub const USERS_PATH: &str = "/users";
pub const ROLES_PATH: &str = "/roles";
pub const PERMISSIONS_PATH: &str = "/permissions";
pub const DEPARTMENTS_PATH: &str = "/departments";
pub const COURSES_PATH: &str = "/courses";

#[derive(Clone, Debug)]
pub struct AdminApis {
    pub users: Arc<UserApi>,
    pub roles: Arc<RoleApi>,
    pub permissions: Arc<PermissionApi>,
    pub departments: Arc<DepartmentApi>,
    pub courses: Arc<CourseApi>,
}

/// Resolved schemas for every resource table.
#[derive(Clone, Debug)]
pub struct AdminSchemas {
    pub users: Arc<ResolvedSchema>,
    pub roles: Arc<ResolvedSchema>,
    pub permissions: Arc<ResolvedSchema>,
    pub departments: Arc<ResolvedSchema>,
    pub courses: Arc<ResolvedSchema>,
}

impl AdminApis {
    pub fn new(client: Arc<dyn HttpClient>) -> Result<Self, ConfigError> {
        Ok(Self {
            users: Arc::new(EntityApi::new(Some(client.clone()), USERS_PATH)?),
            roles: Arc::new(EntityApi::new(Some(client.clone()), ROLES_PATH)?),
            permissions: Arc::new(EntityApi::new(Some(client.clone()), PERMISSIONS_PATH)?),
            departments: Arc::new(EntityApi::new(Some(client.clone()), DEPARTMENTS_PATH)?),
            courses: Arc::new(EntityApi::new(Some(client), COURSES_PATH)?),
        })
    }

    /// Relation sources by the names schemas refer to.
    pub fn registry(&self) -> ApiRegistry {
        ApiRegistry::new()
            .with("users", self.users.clone())
            .with("roles", self.roles.clone())
            .with("permissions", self.permissions.clone())
            .with("departments", self.departments.clone())
            .with("courses", self.courses.clone())
    }

    pub fn schemas(&self) -> Result<AdminSchemas, ConfigError> {
        let registry = self.registry();
        Ok(AdminSchemas {
            users: Arc::new(resolve(&schemas::users(), &registry)?),
            roles: Arc::new(resolve(&schemas::roles(), &registry)?),
            permissions: Arc::new(resolve(&schemas::permissions(), &registry)?),
            departments: Arc::new(resolve(&schemas::departments(), &registry)?),
            courses: Arc::new(resolve(&schemas::courses(), &registry)?),
        })
    }

    /// Users restricted to one department.
    pub fn department_members(&self, department_id: i64) -> ScopedApi<UserApi> {
        ScopedApi::new(
            self.users.as_ref().clone(),
            Filter::new().with("departmentId", department_id),
        )
    }
}

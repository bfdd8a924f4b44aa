use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::repository::{PgQueryAs, Record};

// --- Table Rows (Mapped to Database) ---
//
// One struct per table. Columns are snake_case; every table has an integer identity
// `id` and an `is_deleted` flag. Join rows hold plain integer foreign keys.

/// Role
///
/// A row of the `rols` table.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub is_deleted: bool,
}

/// User
///
/// A row of the `users` table. The password column is stored exactly as received.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub identification: String,
    pub phone: String,
    pub address: String,
    pub is_deleted: bool,
}

/// Permission
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct Permission {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_deleted: bool,
}

/// Form
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct Form {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_deleted: bool,
}

/// Module
///
/// A row of the `modules` table. `code` is free text, not unique.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct Module {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub code: String,
    pub is_deleted: bool,
}

/// RolUser
///
/// Join row: one role granted to one user.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct RolUser {
    pub id: i32,
    pub rol_id: i32,
    pub user_id: i32,
    pub is_deleted: bool,
}

/// RolFormPermission
///
/// Join row: the role may exercise the permission on the form.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct RolFormPermission {
    pub id: i32,
    pub rol_id: i32,
    pub form_id: i32,
    pub permission_id: i32,
    pub is_deleted: bool,
}

/// ModuleForm
///
/// Join row: the form belongs to the module.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct ModuleForm {
    pub id: i32,
    pub module_id: i32,
    pub form_id: i32,
    pub is_deleted: bool,
}

// --- Request/Response Payloads (DTOs) ---
//
// Wire names are PascalCase (`RolId`, `RolName`, ...). Every field defaults, so a body
// with a missing field still deserializes and is rejected by validation instead.

/// RoleDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct RoleDto {
    pub rol_id: i32,
    #[schema(example = "Admin")]
    pub rol_name: String,
    pub is_deleted: bool,
}

/// UserDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub identification: String,
    pub phone: String,
    pub address: String,
    pub is_deleted: bool,
}

/// PermissionDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct PermissionDto {
    pub permission_id: i32,
    pub permission_name: String,
    pub permission_description: String,
    pub is_deleted: bool,
}

/// FormDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct FormDto {
    pub form_id: i32,
    pub form_name: String,
    pub form_description: String,
    pub is_deleted: bool,
}

/// ModuleDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct ModuleDto {
    pub module_id: i32,
    pub module_name: String,
    pub module_description: String,
    pub module_code: String,
    pub is_deleted: bool,
}

/// RolUserDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct RolUserDto {
    pub rol_user_id: i32,
    pub rol_id: i32,
    pub user_id: i32,
    pub is_deleted: bool,
}

/// RolFormPermissionDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct RolFormPermissionDto {
    pub rol_form_permission_id: i32,
    pub rol_id: i32,
    pub form_id: i32,
    pub permission_id: i32,
    pub is_deleted: bool,
}

/// ModuleFormDto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "PascalCase", default)]
#[ts(export)]
pub struct ModuleFormDto {
    pub module_form_id: i32,
    pub module_id: i32,
    pub form_id: i32,
    pub is_deleted: bool,
}

/// MessageResponse
///
/// Body of every error response and of a successful DELETE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    #[schema(example = "Role with id 7 not found")]
    pub message: String,
}

// --- Row <-> DTO mapping ---

impl From<Role> for RoleDto {
    fn from(row: Role) -> Self {
        Self {
            rol_id: row.id,
            rol_name: row.name,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<RoleDto> for Role {
    fn from(dto: RoleDto) -> Self {
        Self {
            id: dto.rol_id,
            name: dto.rol_name,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<User> for UserDto {
    fn from(row: User) -> Self {
        Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            identification: row.identification,
            phone: row.phone,
            address: row.address,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            last_name: dto.last_name,
            email: dto.email,
            password: dto.password,
            identification: dto.identification,
            phone: dto.phone,
            address: dto.address,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<Permission> for PermissionDto {
    fn from(row: Permission) -> Self {
        Self {
            permission_id: row.id,
            permission_name: row.name,
            permission_description: row.description,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<PermissionDto> for Permission {
    fn from(dto: PermissionDto) -> Self {
        Self {
            id: dto.permission_id,
            name: dto.permission_name,
            description: dto.permission_description,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<Form> for FormDto {
    fn from(row: Form) -> Self {
        Self {
            form_id: row.id,
            form_name: row.name,
            form_description: row.description,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<FormDto> for Form {
    fn from(dto: FormDto) -> Self {
        Self {
            id: dto.form_id,
            name: dto.form_name,
            description: dto.form_description,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<Module> for ModuleDto {
    fn from(row: Module) -> Self {
        Self {
            module_id: row.id,
            module_name: row.name,
            module_description: row.description,
            module_code: row.code,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<ModuleDto> for Module {
    fn from(dto: ModuleDto) -> Self {
        Self {
            id: dto.module_id,
            name: dto.module_name,
            description: dto.module_description,
            code: dto.module_code,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<RolUser> for RolUserDto {
    fn from(row: RolUser) -> Self {
        Self {
            rol_user_id: row.id,
            rol_id: row.rol_id,
            user_id: row.user_id,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<RolUserDto> for RolUser {
    fn from(dto: RolUserDto) -> Self {
        Self {
            id: dto.rol_user_id,
            rol_id: dto.rol_id,
            user_id: dto.user_id,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<RolFormPermission> for RolFormPermissionDto {
    fn from(row: RolFormPermission) -> Self {
        Self {
            rol_form_permission_id: row.id,
            rol_id: row.rol_id,
            form_id: row.form_id,
            permission_id: row.permission_id,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<RolFormPermissionDto> for RolFormPermission {
    fn from(dto: RolFormPermissionDto) -> Self {
        Self {
            id: dto.rol_form_permission_id,
            rol_id: dto.rol_id,
            form_id: dto.form_id,
            permission_id: dto.permission_id,
            is_deleted: dto.is_deleted,
        }
    }
}

impl From<ModuleForm> for ModuleFormDto {
    fn from(row: ModuleForm) -> Self {
        Self {
            module_form_id: row.id,
            module_id: row.module_id,
            form_id: row.form_id,
            is_deleted: row.is_deleted,
        }
    }
}

impl From<ModuleFormDto> for ModuleForm {
    fn from(dto: ModuleFormDto) -> Self {
        Self {
            id: dto.module_form_id,
            module_id: dto.module_id,
            form_id: dto.form_id,
            is_deleted: dto.is_deleted,
        }
    }
}

// --- Table descriptions ---
//
// `COLUMNS` lists the writable columns in bind order; `bind_columns` must push
// exactly one value per entry, in the same order.

impl Record for Role {
    const TABLE: &'static str = "rols";
    const COLUMNS: &'static [&'static str] = &["name", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(self.name.clone()).bind(self.is_deleted)
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "last_name",
        "email",
        "password",
        "identification",
        "phone",
        "address",
        "is_deleted",
    ];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.last_name.clone())
            .bind(self.email.clone())
            .bind(self.password.clone())
            .bind(self.identification.clone())
            .bind(self.phone.clone())
            .bind(self.address.clone())
            .bind(self.is_deleted)
    }
}

impl Record for Permission {
    const TABLE: &'static str = "permissions";
    const COLUMNS: &'static [&'static str] = &["name", "description", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.is_deleted)
    }
}

impl Record for Form {
    const TABLE: &'static str = "forms";
    const COLUMNS: &'static [&'static str] = &["name", "description", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.is_deleted)
    }
}

impl Record for Module {
    const TABLE: &'static str = "modules";
    const COLUMNS: &'static [&'static str] = &["name", "description", "code", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.code.clone())
            .bind(self.is_deleted)
    }
}

impl Record for RolUser {
    const TABLE: &'static str = "rol_users";
    const COLUMNS: &'static [&'static str] = &["rol_id", "user_id", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.rol_id)
            .bind(self.user_id)
            .bind(self.is_deleted)
    }
}

impl Record for RolFormPermission {
    const TABLE: &'static str = "rol_form_permissions";
    const COLUMNS: &'static [&'static str] = &["rol_id", "form_id", "permission_id", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.rol_id)
            .bind(self.form_id)
            .bind(self.permission_id)
            .bind(self.is_deleted)
    }
}

impl Record for ModuleForm {
    const TABLE: &'static str = "module_forms";
    const COLUMNS: &'static [&'static str] = &["module_id", "form_id", "is_deleted"];

    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.module_id)
            .bind(self.form_id)
            .bind(self.is_deleted)
    }
}

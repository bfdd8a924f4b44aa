//! Per-entity business rules: collection name, DTO binding and the required-field check.
//!
//! No rule here looks at another table. Join rows are accepted with foreign keys that
//! reference nothing.

use crate::{
    error::ServiceError,
    models::{
        Form, FormDto, Module, ModuleDto, ModuleForm, ModuleFormDto, Permission, PermissionDto,
        RolFormPermission, RolFormPermissionDto, RolUser, RolUserDto, Role, RoleDto, User, UserDto,
    },
    service::{Resource, require_positive, require_text},
};

impl Resource for Role {
    const NAME: &'static str = "Role";
    type Dto = RoleDto;

    fn dto_id(dto: &RoleDto) -> i32 {
        dto.rol_id
    }

    fn validate(dto: &RoleDto) -> Result<(), ServiceError> {
        require_text(Self::NAME, "RolName", &dto.rol_name)
    }
}

impl Resource for User {
    const NAME: &'static str = "User";
    type Dto = UserDto;

    fn dto_id(dto: &UserDto) -> i32 {
        dto.id
    }

    fn validate(dto: &UserDto) -> Result<(), ServiceError> {
        require_text(Self::NAME, "Name", &dto.name)
    }
}

impl Resource for Permission {
    const NAME: &'static str = "Permission";
    type Dto = PermissionDto;

    fn dto_id(dto: &PermissionDto) -> i32 {
        dto.permission_id
    }

    fn validate(dto: &PermissionDto) -> Result<(), ServiceError> {
        require_text(Self::NAME, "PermissionName", &dto.permission_name)
    }
}

impl Resource for Form {
    const NAME: &'static str = "Form";
    type Dto = FormDto;

    fn dto_id(dto: &FormDto) -> i32 {
        dto.form_id
    }

    fn validate(dto: &FormDto) -> Result<(), ServiceError> {
        require_text(Self::NAME, "FormName", &dto.form_name)
    }
}

impl Resource for Module {
    const NAME: &'static str = "Module";
    type Dto = ModuleDto;

    fn dto_id(dto: &ModuleDto) -> i32 {
        dto.module_id
    }

    fn validate(dto: &ModuleDto) -> Result<(), ServiceError> {
        require_text(Self::NAME, "ModuleName", &dto.module_name)
    }
}

// Join tables: only the leading foreign key is checked.

impl Resource for RolUser {
    const NAME: &'static str = "RolUser";
    type Dto = RolUserDto;

    fn dto_id(dto: &RolUserDto) -> i32 {
        dto.rol_user_id
    }

    fn validate(dto: &RolUserDto) -> Result<(), ServiceError> {
        require_positive(Self::NAME, "UserId", dto.user_id)
    }
}

impl Resource for RolFormPermission {
    const NAME: &'static str = "RolFormPermission";
    type Dto = RolFormPermissionDto;

    fn dto_id(dto: &RolFormPermissionDto) -> i32 {
        dto.rol_form_permission_id
    }

    fn validate(dto: &RolFormPermissionDto) -> Result<(), ServiceError> {
        require_positive(Self::NAME, "RolId", dto.rol_id)
    }
}

impl Resource for ModuleForm {
    const NAME: &'static str = "ModuleForm";
    type Dto = ModuleFormDto;

    fn dto_id(dto: &ModuleFormDto) -> i32 {
        dto.module_form_id
    }

    fn validate(dto: &ModuleFormDto) -> Result<(), ServiceError> {
        require_positive(Self::NAME, "ModuleId", dto.module_id)
    }
}

use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Class, User};
use crate::db::types::Role;
use crate::error::StoreError;
use crate::schemas::directory::{ClassData, ClassView, UserData, UserView};
use uuid::Uuid;

pub async fn save_user(ctx: &AppContext, data: UserData) -> Result<UserView, StoreError> {
    data.validate()?;
    let now = primitive_now_utc();

    let existing = match &data.id {
        Some(id) => ctx.backend().user_by_id(id).await?,
        None => None,
    };
    let user = User {
        id: data.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        email: data.email,
        full_name: data.full_name,
        role: data.role,
        group_name: data.group_name,
        created_at: existing.as_ref().map_or(now, |user| user.created_at),
        updated_at: now,
    };
    ctx.backend().save_user(&user).await?;
    Ok(user_view(user))
}

pub async fn get_user(ctx: &AppContext, id: &str) -> Result<Option<UserView>, StoreError> {
    Ok(ctx.backend().user_by_id(id).await?.map(user_view))
}

pub async fn get_all_users(ctx: &AppContext) -> Result<Vec<UserView>, StoreError> {
    Ok(ctx.backend().list_users().await?.into_iter().map(user_view).collect())
}

/// Students in a residence group, used by the assignment services to resolve
/// group-targeted work into concrete student rows.
pub async fn get_students_in_group(
    ctx: &AppContext,
    group: &str,
) -> Result<Vec<UserView>, StoreError> {
    Ok(ctx
        .backend()
        .users_in_group(group)
        .await?
        .into_iter()
        .filter(|user| user.role == Role::Student)
        .map(user_view)
        .collect())
}

pub async fn delete_user(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    ctx.backend().delete_user(id).await
}

pub async fn save_class(ctx: &AppContext, data: ClassData) -> Result<ClassView, StoreError> {
    data.validate()?;
    let now = primitive_now_utc();

    let existing = match &data.id {
        Some(id) => ctx.backend().class_by_id(id).await?,
        None => None,
    };
    let class = Class {
        id: data.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: data.title,
        subject: data.subject,
        created_at: existing.as_ref().map_or(now, |class| class.created_at),
        updated_at: now,
    };
    ctx.backend().save_class(&class).await?;
    Ok(class_view(class))
}

pub async fn get_class(ctx: &AppContext, id: &str) -> Result<Option<ClassView>, StoreError> {
    Ok(ctx.backend().class_by_id(id).await?.map(class_view))
}

pub async fn get_all_classes(ctx: &AppContext) -> Result<Vec<ClassView>, StoreError> {
    Ok(ctx.backend().list_classes().await?.into_iter().map(class_view).collect())
}

pub async fn delete_class(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    ctx.backend().delete_class(id).await
}

fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
        group_name: user.group_name,
        created_at: format_primitive(user.created_at),
        updated_at: format_primitive(user.updated_at),
    }
}

fn class_view(class: Class) -> ClassView {
    ClassView {
        id: class.id,
        title: class.title,
        subject: class.subject,
        created_at: format_primitive(class.created_at),
        updated_at: format_primitive(class.updated_at),
    }
}

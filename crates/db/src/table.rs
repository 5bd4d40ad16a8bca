use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Email,
    Name,
    Password,
    IsActive,
    IsStaff,
    IsSuperuser,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Recipe {
    Table,
    Id,
    OwnerId,
    Title,
    TimeMinutes,
    PriceCents,
    Description,
    Link,
    Image,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Tag {
    Table,
    Id,
    OwnerId,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum Ingredient {
    Table,
    Id,
    OwnerId,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeTag {
    Table,
    RecipeId,
    TagId,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeIngredient {
    Table,
    RecipeId,
    IngredientId,
}

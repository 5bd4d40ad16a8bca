use larder_recipe::{CreateInput, ItemInput, Price, RecipeFilter};
use temp_dir::TempDir;

mod helpers;

fn recipe(title: &str, tags: &[&str], ingredients: &[&str]) -> CreateInput {
    let mut input = CreateInput::new(title, 10, Price::from_cents(500));
    input.tags = tags.iter().map(|t| ItemInput::new(*t)).collect();
    input.ingredients = ingredients.iter().map(|i| ItemInput::new(*i)).collect();
    input
}

#[tokio::test]
async fn test_list_is_owner_scoped_and_ordered() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let setup = helpers::setup(&dir).await?;
    let owner = helpers::create_user(&setup.state, "john@example.com").await?;
    let other = helpers::create_user(&setup.state, "jane@example.com").await?;

    let first = setup.cmd.create(owner, recipe("First", &[], &[])).await?;
    setup.cmd.create(other, recipe("Foreign", &[], &[])).await?;
    let second = setup.cmd.create(owner, recipe("Second", &[], &[])).await?;

    let recipes = setup.cmd.list(owner, &RecipeFilter::default()).await?;
    let ids = recipes.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}

#[tokio::test]
async fn test_list_includes_links() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let setup = helpers::setup(&dir).await?;
    let owner = helpers::create_user(&setup.state, "john@example.com").await?;

    setup
        .cmd
        .create(owner, recipe("Curry", &["Vegan", "Dinner"], &["Rice"]))
        .await?;

    let recipes = setup.cmd.list(owner, &RecipeFilter::default()).await?;
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].tags.len(), 2);
    assert_eq!(recipes[0].ingredients[0].name, "Rice");

    Ok(())
}

#[tokio::test]
async fn test_filter_by_tags() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let setup = helpers::setup(&dir).await?;
    let owner = helpers::create_user(&setup.state, "john@example.com").await?;

    let curry = setup
        .cmd
        .create(owner, recipe("Thai Vegetable Curry", &["Vegan", "Dinner"], &[]))
        .await?;
    let tahini = setup
        .cmd
        .create(owner, recipe("Aubergine with Tahini", &["Vegetarian"], &[]))
        .await?;
    setup
        .cmd
        .create(owner, recipe("Fish and chips", &[], &[]))
        .await?;

    let tag_ids = curry
        .tags
        .iter()
        .chain(tahini.tags.iter())
        .map(|t| t.id)
        .collect::<Vec<_>>();

    let recipes = setup
        .cmd
        .list(
            owner,
            &RecipeFilter {
                tags: Some(tag_ids),
                ..Default::default()
            },
        )
        .await?;

    let ids = recipes.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![tahini.id, curry.id]);

    Ok(())
}

#[tokio::test]
async fn test_filter_by_ingredients() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let setup = helpers::setup(&dir).await?;
    let owner = helpers::create_user(&setup.state, "john@example.com").await?;

    let beans = setup
        .cmd
        .create(owner, recipe("Posh beans on toast", &[], &["Feta cheese"]))
        .await?;
    let chicken = setup
        .cmd
        .create(owner, recipe("Chicken cacciatore", &[], &["Chicken"]))
        .await?;
    setup
        .cmd
        .create(owner, recipe("Red lentil daal", &[], &["Lentils"]))
        .await?;

    let recipes = setup
        .cmd
        .list(
            owner,
            &RecipeFilter {
                ingredients: Some(vec![beans.ingredients[0].id, chicken.ingredients[0].id]),
                ..Default::default()
            },
        )
        .await?;

    let ids = recipes.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![chicken.id, beans.id]);

    Ok(())
}

#[tokio::test]
async fn test_filters_are_combined_and_deduplicated() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let setup = helpers::setup(&dir).await?;
    let owner = helpers::create_user(&setup.state, "john@example.com").await?;

    let both = setup
        .cmd
        .create(owner, recipe("Both", &["A", "B"], &["X", "Y"]))
        .await?;
    setup
        .cmd
        .create(owner, recipe("Tags only", &["A", "B"], &[]))
        .await?;

    let recipes = setup
        .cmd
        .list(
            owner,
            &RecipeFilter {
                tags: Some(both.tags.iter().map(|t| t.id).collect()),
                ingredients: Some(both.ingredients.iter().map(|i| i.id).collect()),
            },
        )
        .await?;

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].id, both.id);

    Ok(())
}

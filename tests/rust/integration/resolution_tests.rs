use relir::catalog::EntityCatalog;
use relir::config::TranslatorConfig;
use relir::ir::{
    add_flattened_selection, add_join_key_selections, expand_ref_column,
    get_or_create_navigation, get_or_create_selectable, navigate_path, IrErrorKind, IrFactory,
    KeyValue, RefColumn, Selectable, ValueType,
};

use super::common::blogging_catalog;

#[test]
fn test_navigation_reused_across_accesses() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[select].from();

    let first = get_or_create_navigation(&mut factory, &catalog, select, blog, "User").unwrap();
    let second = get_or_create_navigation(&mut factory, &catalog, select, blog, "User").unwrap();

    assert_eq!(first, second);
    assert_eq!(factory.graph()[select].joins().len(), 1);
}

#[test]
fn test_flattening_entity_shape_twice() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Post", "posts");
    let post = factory.graph()[select].from();
    let blog = get_or_create_navigation(&mut factory, &catalog, select, post, "Blog").unwrap();

    let shape = Selectable::KeyValues(vec![
        KeyValue::new("Post", Selectable::Reference(post)),
        KeyValue::new("Blog", Selectable::Reference(blog)),
    ]);
    add_flattened_selection(&mut factory, select, &shape);
    let before = factory.graph().clone();
    add_flattened_selection(&mut factory, select, &shape);

    assert_eq!(factory.graph(), &before);
    assert_eq!(factory.graph()[select].selection().len(), 2);
}

#[test]
fn test_entity_expansion_reuses_resolved_columns() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Post", "posts");
    let post = factory.graph()[select].from();
    let blog = get_or_create_navigation(&mut factory, &catalog, select, post, "Blog").unwrap();
    let ref_column = factory.build_ref_column(blog, None, None);

    let first = expand_ref_column(&mut factory, &catalog, &ref_column).unwrap();
    let before = factory.graph().clone();
    let second = expand_ref_column(&mut factory, &catalog, &ref_column).unwrap();

    let names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["BlogId", "Url", "Name", "UserId", "CommentCount"]);
    assert_eq!(first, second);
    assert_eq!(factory.graph(), &before);
    assert_eq!(factory.graph()[blog].resolved_columns().count(), 5);
}

#[test]
fn test_expansion_through_subquery() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let inner = factory.build_table_select("Post", "posts");
    let post = factory.graph()[inner].from();
    let blog = get_or_create_navigation(&mut factory, &catalog, inner, post, "Blog").unwrap();
    let outer = factory.build_sub_select(inner).unwrap();
    let sq = factory.graph()[outer].from();

    let inner_access = factory.build_ref_column(blog, Some("Blog".to_string()), None);
    let promoted = get_or_create_selectable(
        &mut factory,
        &Selectable::RefColumn(inner_access.clone()),
        Some(sq),
    )
    .unwrap();
    let outer_access = match promoted {
        Selectable::RefColumn(rc) => rc,
        other => panic!("expected a ref column, got {:?}", other),
    };

    let columns = expand_ref_column(&mut factory, &catalog, &outer_access).unwrap();
    let graph = factory.finish();

    assert!(columns.iter().all(|c| c.reference == sq));
    assert!(graph[inner].contains_selection(&Selectable::RefColumn(inner_access)));
    assert!(graph[blog].resolved_column("Name").is_some());
    assert!(graph[sq].resolved_column("Name").is_some());
}

#[test]
fn test_join_keys_propagate_through_three_levels() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let innermost = factory.build_table_select("Comment", "comments");
    let comment = factory.graph()[innermost].from();
    let user =
        navigate_path(&mut factory, &catalog, innermost, comment, &["Post", "Blog", "User"]).unwrap();
    let middle = factory.build_sub_select(innermost).unwrap();
    let outer = factory.build_sub_select(middle).unwrap();
    let sq_inner = factory.graph()[middle].from();
    let sq_outer = factory.graph()[outer].from();

    let link0 = factory.build_ref_column(user, None, None);
    let link1 = factory.build_ref_column(sq_inner, None, Some(&link0));
    let link2 = factory.build_ref_column(sq_outer, None, Some(&link1));
    assert_eq!(link2.chain().len(), 3);

    let key_type = catalog.entity("User").unwrap().column("UserId").unwrap().val_type;
    let columns = add_join_key_selections(&mut factory, &link2, &[("UserId", key_type)]).unwrap();
    let graph = factory.finish();

    let terminal = graph[user].resolved_column("UserId_jk").unwrap();
    assert_eq!(terminal.name, "UserId");
    assert_eq!(terminal.alias.as_deref(), Some("UserId_jk"));

    let mid = graph[sq_inner].resolved_column("UserId_jk").unwrap();
    assert_eq!(mid.alias, None);
    assert!(mid.is_join_key);

    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].reference, sq_outer);
    assert_eq!(columns[0].name, "UserId_jk");
    assert_eq!(graph[sq_outer].resolved_column("UserId_jk"), Some(&columns[0]));
}

#[test]
fn test_join_key_suffix_follows_config() {
    let catalog = blogging_catalog();
    let config = TranslatorConfig {
        join_key_suffix: "_key".to_string(),
        ..Default::default()
    };
    let mut factory = IrFactory::new(config);
    let select = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[select].from();
    let user = get_or_create_navigation(&mut factory, &catalog, select, blog, "User").unwrap();
    let access = factory.build_ref_column(user, None, None);

    let columns =
        add_join_key_selections(&mut factory, &access, &[("UserId", ValueType::Integer)]).unwrap();
    assert_eq!(columns[0].alias_or_name(), "UserId_key");
}

#[test]
fn test_expansion_of_unknown_entity() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Tag", "tags");
    let tag = factory.graph()[select].from();
    let access: RefColumn = factory.build_ref_column(tag, None, None);

    let err = expand_ref_column(&mut factory, &catalog, &access).unwrap_err();
    assert_eq!(err.kind(), IrErrorKind::Catalog);
}

#[test]
fn test_expansion_after_join_keys_keeps_both_entries() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let inner = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[inner].from();
    let user = get_or_create_navigation(&mut factory, &catalog, inner, blog, "User").unwrap();
    let outer = factory.build_sub_select(inner).unwrap();
    let sq = factory.graph()[outer].from();

    let inner_access = factory.build_ref_column(user, None, None);
    let outer_access = factory.build_ref_column(sq, None, Some(&inner_access));
    add_join_key_selections(&mut factory, &outer_access, &[("UserId", ValueType::Integer)])
        .unwrap();
    let columns = expand_ref_column(&mut factory, &catalog, &outer_access).unwrap();
    let graph = factory.finish();

    assert!(columns.iter().all(|c| !c.is_join_key && c.alias.is_none()));
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["UserId", "UserName"]);

    let key = graph[user].resolved_column("UserId_jk").unwrap();
    assert!(key.is_join_key);
    assert_eq!(key.alias.as_deref(), Some("UserId_jk"));
    let plain = graph[user].resolved_column("UserId").unwrap();
    assert!(!plain.is_join_key);
    assert_eq!(plain.alias, None);

    assert!(graph[sq].resolved_column("UserId_jk").unwrap().is_join_key);
    assert!(!graph[sq].resolved_column("UserId").unwrap().is_join_key);
}

use relir::ir::{
    add_flattened_selection, IrFactory, KeyValue, Selectable, ValueType,
};

use super::common::init_logging;

#[test]
fn test_group_by_tracks_selection() {
    init_logging();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[select].from();
    factory.set_group_by(select, true);

    let blog_id: Selectable = factory
        .build_column(blog, "BlogId", ValueType::Integer, None)
        .unwrap()
        .into();
    factory.graph_mut()[select].add_selection(blog_id.clone());
    {
        let graph = factory.graph();
        assert_eq!(graph[select].selection(), &[blog_id.clone()]);
        assert_eq!(graph[select].group_by().unwrap().len(), 1);
    }

    let comment_count: Selectable = factory
        .build_column(blog, "CommentCount", ValueType::Integer, None)
        .unwrap()
        .into();
    factory.graph_mut()[select].add_selection(comment_count.clone());

    let graph = factory.finish();
    let expected = vec![blog_id, comment_count];
    assert_eq!(graph[select].selection(), expected.as_slice());
    let keys: Vec<Selectable> = graph[select].group_by().unwrap().iter().cloned().collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_group_by_never_duplicates_keys() {
    init_logging();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[select].from();
    factory.set_group_by(select, false);

    let blog_id: Selectable = factory
        .build_column(blog, "BlogId", ValueType::Integer, None)
        .unwrap()
        .into();
    factory.graph_mut()[select].add_selection(blog_id.clone());
    factory.graph_mut()[select].add_selection(blog_id);

    let graph = factory.finish();
    assert_eq!(graph[select].selection().len(), 2);
    assert_eq!(graph[select].group_by().unwrap().len(), 1);
}

#[test]
fn test_flattened_shape_feeds_group_by() {
    init_logging();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Post", "posts");
    let post = factory.graph()[select].from();
    factory.set_group_by(select, false);

    let blog_id = factory
        .build_column(post, "BlogId", ValueType::Integer, None)
        .unwrap();
    let user_id = factory
        .build_column(post, "UserId", ValueType::Integer, None)
        .unwrap();
    let key = Selectable::KeyValues(vec![
        KeyValue::new("Blog", Selectable::Column(blog_id)),
        KeyValue::new("Author", Selectable::Column(user_id)),
    ]);

    let leaves = add_flattened_selection(&mut factory, select, &key);
    let graph = factory.finish();

    assert_eq!(leaves.len(), 2);
    let aliases: Vec<Option<&str>> = graph[select].selection().iter().map(|s| s.alias()).collect();
    assert_eq!(aliases, vec![Some("Blog"), Some("Author")]);
    assert_eq!(graph[select].group_by().unwrap().len(), 2);
    assert!(graph.validate_select(select).is_ok());
}

use relir::ir::{
    navigate_path, update_join_type, ExprToken, IrFactory, JoinType, ValueType,
};

use super::common::{blogging_catalog, init_logging};

#[test]
fn test_promotion_flips_inner_join_once() {
    init_logging();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Blog", "blogs");
    let blog = factory.graph()[select].from();
    let user = factory.build_table_reference(select, "User", "users");

    let left = factory
        .build_column(blog, "UserId", ValueType::Integer, None)
        .unwrap();
    let right = factory
        .build_column(user, "UserId", ValueType::Integer, None)
        .unwrap();
    let condition = factory
        .build_binary(ExprToken::Equal, left.into(), right.into())
        .unwrap();
    let join = factory.build_join(select, blog, user, condition).unwrap();

    let mut graph = factory.finish();
    assert_eq!(graph[join].kind(), JoinType::Inner);

    assert_eq!(update_join_type(&mut graph, user), 1);
    assert_eq!(graph[join].kind(), JoinType::LeftOuter);

    let snapshot = graph.clone();
    assert_eq!(update_join_type(&mut graph, user), 0);
    assert_eq!(graph, snapshot);
}

#[test]
fn test_promotion_walks_navigation_chain() {
    let catalog = blogging_catalog();
    let mut factory = IrFactory::default();
    let select = factory.build_table_select("Comment", "comments");
    let comment = factory.graph()[select].from();
    let post_author = navigate_path(&mut factory, &catalog, select, comment, &["Post", "User"]).unwrap();
    let blog_owner =
        navigate_path(&mut factory, &catalog, select, comment, &["Post", "Blog", "User"]).unwrap();

    let mut graph = factory.finish();
    // Post is shared by both paths
    assert_eq!(graph[select].joins().len(), 4);

    assert_eq!(update_join_type(&mut graph, blog_owner), 3);
    let kinds: Vec<JoinType> = graph.joins_of(select).map(|j| j.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            JoinType::LeftOuter,
            JoinType::Inner,
            JoinType::LeftOuter,
            JoinType::LeftOuter
        ]
    );

    assert_eq!(update_join_type(&mut graph, post_author), 1);
    assert!(graph.joins_of(select).all(|j| j.kind() == JoinType::LeftOuter));
}

use serde_json::json;
use serde_jsonapi::member::{classify, is_valid_member_name, MemberKind};
use serde_jsonapi::{
    parse_str, parse_value, to_string, to_value, Document, Engine, Error, ErrorKind, Fieldsets,
    IncludePaths, Link, LinkObject, Links, MediaType, Negotiator, Options, Relationship,
    RelationshipData, Resource, ResourceIdentifier, Version,
};

#[test]
fn test_member_name_grammar() {
    for good in ["title", "first-name", "first_name", "a b", "x1", "caf\u{e9}"] {
        assert!(is_valid_member_name(good), "{good}");
    }
    for bad in ["", "-lead", "trail_", " pad", "dot.ted", "slash/", "a+b"] {
        assert!(!is_valid_member_name(bad), "{bad}");
    }
    assert_eq!(classify("@context"), Some(MemberKind::At));
    assert_eq!(classify("atomic:operations"), Some(MemberKind::Extension));
    assert_eq!(classify("title"), Some(MemberKind::Plain));
    assert_eq!(classify("bad!"), None);
}

#[test]
fn test_at_members_ignored_inside_resources() {
    let doc = parse_str(
        r#"{"data":{"type":"articles","id":"1","@context":"https://schema.org","attributes":{"@type":"Article"}}}"#,
    )
    .unwrap();
    let article = doc.data().and_then(|d| d.single()).unwrap();
    assert_eq!(article.kind(), "articles");
}

#[test]
fn test_extension_member_in_attributes_rejected() {
    let err = parse_str(r#"{"data":{"type":"a","id":"1","attributes":{"ext:flag":true}}}"#)
        .unwrap_err();
    assert_eq!(
        err.validation_errors()
            .and_then(|v| v.at("/data/attributes/ext:flag"))
            .map(|v| v.kind),
        Some(ErrorKind::InvalidMemberName)
    );
}

#[test]
fn test_relationship_data_shapes() {
    let doc = parse_str(
        r#"{"data":{"type":"articles","id":"1","relationships":{
            "author":{"data":null},
            "tags":{"data":[]},
            "comments":{"links":{"related":"/articles/1/comments"}},
            "editor":{"meta":{"pending":true}}
        }}}"#,
    )
    .unwrap();
    let article = doc.data().and_then(|d| d.single()).unwrap();

    let author = article.relationship("author").unwrap();
    assert_eq!(author.data(), Some(&RelationshipData::ToOne(None)));
    let tags = article.relationship("tags").unwrap();
    assert_eq!(tags.data(), Some(&RelationshipData::ToMany(vec![])));
    assert!(article.relationship("comments").unwrap().data().is_none());
    assert!(article.relationship("editor").unwrap().meta().is_some());

    let text = to_string(&doc).unwrap();
    assert!(text.contains(r#""author":{"data":null}"#));
    assert!(text.contains(r#""tags":{"data":[]}"#));
}

#[test]
fn test_relationship_links_need_self_or_related() {
    let err = parse_str(
        r#"{"data":{"type":"a","id":"1","relationships":{"r":{"links":{"describedby":"/schema"}}}}}"#,
    )
    .unwrap_err();
    assert!(err.has_kind(ErrorKind::InvalidLink));

    assert!(Relationship::from_links(Links::new().with("describedby", "/schema")).is_err());
    assert!(Relationship::from_links(Links::new().with("related", "/a/1/r")).is_ok());
}

#[test]
fn test_pagination_links_in_to_many_relationships() {
    let ok = parse_str(
        r#"{"data":{"type":"a","id":"1","relationships":{"r":{
            "links":{"related":"/a/1/r","next":"/a/1/r?page=2"},"data":[]}}}}"#,
    );
    assert!(ok.is_ok());

    let err = parse_str(
        r#"{"data":{"type":"a","id":"1","relationships":{"r":{
            "links":{"related":"/a/1/r","next":"/a/1/r?page=2"},"data":null}}}}"#,
    )
    .unwrap_err();
    assert!(err
        .validation_errors()
        .unwrap()
        .at("/data/relationships/r/links/next")
        .is_some());
}

#[test]
fn test_link_objects_round_trip() {
    let input = json!({
        "data": [],
        "links": {
            "self": {"href": "/articles", "title": "Articles", "hreflang": ["en", "fr-CA"]},
            "describedby": {"href": "/schemas/articles", "type": "application/schema+json"},
            "next": null
        }
    });
    let doc = parse_value(input.clone()).unwrap();
    let links = doc.links().unwrap();
    assert_eq!(links.self_href(), Some("/articles"));
    assert!(matches!(links.get("next"), Some(Link::Null)));
    assert_eq!(to_value(&doc).unwrap(), input);
}

#[test]
fn test_bad_hreflang_and_uri() {
    assert!(LinkObject::builder("/x").hreflang("not a tag").build().is_err());
    assert!(LinkObject::builder("has space").build().is_err());
    let err = parse_str(r#"{"data":null,"links":{"self":"a b"}}"#).unwrap_err();
    assert!(err.validation_errors().unwrap().at("/links/self").is_some());
}

#[test]
fn test_jsonapi_object() {
    let doc = parse_str(
        r#"{"meta":{},"jsonapi":{"version":"1.1","ext":["https://jsonapi.org/ext/atomic"],"profile":["http://example.com/profiles/flexible-pagination"]}}"#,
    )
    .unwrap();
    let jsonapi = doc.jsonapi().unwrap();
    assert_eq!(jsonapi.version, Some(Version::V1_1));
    assert_eq!(jsonapi.ext.len(), 1);

    let implied = parse_str(r#"{"meta":{},"jsonapi":{}}"#).unwrap();
    assert_eq!(implied.jsonapi().unwrap().effective_version(), Version::V1_0);

    let err = parse_str(r#"{"meta":{},"jsonapi":{"version":"1.2"}}"#).unwrap_err();
    assert!(err.has_kind(ErrorKind::InvalidVersion));
}

#[test]
fn test_sparse_fieldsets() {
    let doc = parse_str(
        r#"{"data":{"type":"articles","id":"1",
            "attributes":{"title":"A","body":"long"},
            "relationships":{"author":{"data":{"type":"people","id":"9"}}}},
           "included":[{"type":"people","id":"9","attributes":{"name":"Dan","age":40}}]}"#,
    )
    .unwrap();
    let fields = Fieldsets::from_query("fields[articles]=title&fields[people]=name&page=2").unwrap();
    let sparse = doc.sparse(&fields);

    assert_eq!(
        to_value(&sparse).unwrap(),
        json!({
            "data": {"type": "articles", "id": "1", "attributes": {"title": "A"}},
            "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
        })
    );
    assert!(Fieldsets::from_query("fields[articles]=bad.name").is_err());
}

#[test]
fn test_include_paths_parse() {
    let paths = IncludePaths::parse("author,comments.author,author").unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths.contains("comments.author"));
    assert_eq!(paths.to_string(), "author,comments.author");
    assert!(matches!(
        IncludePaths::parse("comments..author"),
        Err(Error::InvalidQueryParameter { .. })
    ));
}

#[test]
fn test_media_type_negotiation() {
    let negotiator = Negotiator::new().with_extension("https://jsonapi.org/ext/atomic");
    assert!(negotiator.check_content_type("application/vnd.api+json").is_ok());

    let err = negotiator
        .check_content_type("application/vnd.api+json; charset=utf-8")
        .unwrap_err();
    assert_eq!(err.kind().status(), 415);

    let chosen = negotiator
        .check_accept(
            r#"application/vnd.api+json; ext="https://jsonapi.org/ext/atomic"; q=0.5, application/vnd.api+json; q=0.8"#,
        )
        .unwrap();
    assert_eq!(chosen, MediaType::new());

    let err = negotiator
        .check_accept(r#"application/vnd.api+json; ext="https://example.com/other""#)
        .unwrap_err();
    assert!(err.to_string().contains("unsupported extensions"));
    assert_eq!(err.kind().status(), 406);

    let err = negotiator.check_accept("text/html").unwrap_err();
    assert!(matches!(err, Error::NotAcceptable(_)));
}

#[test]
fn test_to_many_linkage_order_is_kept() {
    let ids = ["3", "1", "2"];
    let linkage: Vec<_> = ids
        .iter()
        .map(|id| ResourceIdentifier::of("comments", *id).unwrap())
        .collect();
    let article = Resource::builder("articles")
        .id("1")
        .relationship("comments", Relationship::to_many(linkage))
        .build()
        .unwrap();
    let doc = Document::with_data(article, None, None, None).unwrap();
    let again = parse_str(&to_string(&doc).unwrap()).unwrap();
    let order: Vec<_> = again
        .data()
        .and_then(|d| d.single())
        .and_then(|a| a.relationship("comments"))
        .map(|r| r.linkage().iter().filter_map(|l| l.identifier().id()).collect())
        .unwrap_or_default();
    assert_eq!(order, ids);
}

#[test]
fn test_pagination_option_off() {
    let engine = Engine::with_options(Options::new().with_pagination_links(false));
    assert!(engine
        .parse_str(r#"{"data":{"type":"a","id":"1"},"links":{"first":"/a?page=1"}}"#)
        .is_ok());
}

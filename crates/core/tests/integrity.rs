mod common;

use common::*;
use retrieve_api::{ApiError, AttributeService, MemberDef, ModuleId, TypeDef, TypeName};
use retrieve_core::{Domain, Retriever, RetrieverHandle, RetrieveError};
use retrieve_ingest::IngestError;
use retrieve_plugin::{Module, Record};

#[test]
fn test_claimed_marker_missing_from_live_metadata_is_skew() {
    let skewed = Module::builder("Skewed")
        .define(TypeDef::class("skew.S").member(MemberDef::method("M")))
        .records(vec![Record::member("skew.S", "M").marked_with("TGAttribute")])
        .build();
    let domain = Domain::with_modules(modules(vec![runtime_module(), name_a_module(), skewed]));
    let h = RetrieverHandle::new(domain);

    let err = h.get_all_attributes(&TypeName::new("TGAttribute")).unwrap_err();
    match err {
        ApiError::MetadataSkew {
            declaration,
            annotation,
        } => {
            assert_eq!(declaration, "skew.S.M");
            assert_eq!(annotation, "TGAttribute");
        }
        other => panic!("expected skew, got {other:?}"),
    }
}

#[test]
fn test_record_for_unknown_type_fails_ingestion() {
    let broken = Module::builder("Broken")
        .records(vec![Record::ty("broken.Gone")])
        .build();
    let domain = Domain::with_modules(modules(vec![runtime_module(), name_a_module(), broken]));
    let retriever = Retriever::new(domain);

    let err = retriever.subtypes_of(&"bt_it.MyBaseType".into()).unwrap_err();
    assert!(matches!(
        err,
        RetrieveError::Ingest(IngestError::UnresolvedType { .. })
    ));
}

#[test]
fn test_stripped_member_annotation_fails_ingestion() {
    let stripped = Module::builder("Stripped")
        .define(TypeDef::class("s.T").member(MemberDef::method("M")))
        .records(vec![Record::member("s.T", "M")])
        .build();
    let domain = Domain::with_modules(modules(vec![runtime_module(), stripped]));
    let h = RetrieverHandle::new(domain);

    let err = h.get_all_attributes(&TypeName::new(ROOT)).unwrap_err();
    assert!(matches!(err, ApiError::Ingestion(_)));
}

#[test]
fn test_claimed_marker_must_be_an_annotation() {
    let bad = Module::builder("Bad")
        .define(TypeDef::class("b.T"))
        .records(vec![Record::ty("b.T").marked_with("bt_it.MyBaseType")])
        .build();
    let domain = Domain::with_modules(modules(vec![runtime_module(), name_a_module(), bad]));
    let err = Retriever::new(domain).sync().unwrap_err();
    assert!(matches!(
        err,
        RetrieveError::Ingest(IngestError::UnresolvedMarker { .. })
    ));
}

#[test]
fn test_scoped_query_on_uninstrumented_module_ignores_broken_siblings() {
    let broken = Module::builder("Broken")
        .records(vec![Record::ty("broken.Gone")])
        .build();
    let domain = Domain::with_modules(modules(vec![
        runtime_module(),
        name_a_module(),
        uninstrumented_module(),
        broken,
    ]));
    let retriever = Retriever::new(domain);
    let legacy = ModuleId::new("Legacy");

    let subs = retriever
        .subtypes_of_in(&"bt_it.MyBaseType".into(), &legacy)
        .unwrap();
    assert!(subs.is_empty());
    let attrs = retriever
        .attributes_of_in(&TypeName::new("TGAttribute"), &legacy)
        .unwrap();
    assert!(attrs.is_empty());

    assert!(retriever.subtypes_of(&"bt_it.MyBaseType".into()).is_err());
}

#![allow(dead_code)]

use retrieve_api::{
    Annotation, AttachedAnnotation, Declaration, GenericArg, MemberDef, TypeDef, TypeRef,
};
use retrieve_core::Domain;
use retrieve_plugin::{Module, ModuleSource, Record};
use std::any::Any;
use std::sync::Arc;

pub const ROOT: &str = "Retrieve.DirectRetrieve";
pub const COLLECTOR: &str = "Retrieve.IDirectRetrieve";
pub const PRESERVING_COLLECTOR: &str = "Retrieve.IPreservedRetrieve";

/// Annotation value that remembers where it was bound.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub path: String,
    pub bound_to: Option<String>,
}

impl Annotation for Route {
    fn on_receive_target(&mut self, target: &Declaration) {
        self.bound_to = Some(target.to_string());
    }

    fn preserve_target(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Uninstrumented module that defines the retrieval roots.
pub fn runtime_module() -> Arc<Module> {
    Module::builder("Retrieve.Runtime")
        .define(TypeDef::annotation(ROOT).retrievable())
        .define(TypeDef::interface(COLLECTOR).collect_subtypes(false))
        .define(TypeDef::interface(PRESERVING_COLLECTOR).collect_subtypes(true))
        .build()
}

fn tag(name: &str) -> AttachedAnnotation {
    AttachedAnnotation::plain(name)
}

/// The analyzed test module.
pub fn name_a_module() -> Arc<Module> {
    let sub_a_of = |arg: GenericArg| TypeRef::generic("bt_it.SubA", [arg]);
    let imp_a_int = TypeRef::constructed("bt_it.ImpA", [TypeRef::plain("int")]);

    Module::builder("NameA")
        // annotation types
        .define(TypeDef::annotation("TGAttribute").extends(ROOT))
        .define(TypeDef::annotation("INNAttribute").extends(ROOT))
        .define(TypeDef::annotation("EnumAttribute").extends(ROOT))
        .define(TypeDef::annotation("RouteAttribute").extends(ROOT))
        .define(TypeDef::annotation("PlainAttribute"))
        // annotated members and types
        .define(
            TypeDef::class("innerA.innerB.TestClassA")
                .with_params(["T"])
                .member(MemberDef::method("Bar").annotate(tag("TGAttribute")))
                .member(MemberDef::method("Foo").annotate(tag("TGAttribute")))
                .member(MemberDef::method("Foo2").annotate(tag("TGAttribute"))),
        )
        .define(
            TypeDef::class("innerA.innerB.TestGenericB")
                .with_params(["T", "F", "G"])
                .annotate(tag("TGAttribute")),
        )
        .define(
            TypeDef::class("innerA.innerB.TestGenericB.Inner")
                .annotate(tag("INNAttribute"))
                .member(MemberDef::method("Bar").annotate(tag("INNAttribute"))),
        )
        .define(TypeDef::class("innerA.innerB.TestGenericB.Inner.Far").annotate(tag("INNAttribute")))
        .define(
            TypeDef::enumeration("bt_it.FooEnum")
                .member(MemberDef::enum_constant("Default"))
                .member(MemberDef::enum_constant("Foo"))
                .member(MemberDef::enum_constant("Bar").annotate(tag("EnumAttribute")))
                .member(MemberDef::enum_constant("Baz").annotate(tag("EnumAttribute")))
                .member(MemberDef::enum_constant("Length")),
        )
        .define(
            TypeDef::class("web.HomeController").member(
                MemberDef::method("Index")
                    .annotate(AttachedAnnotation::new(
                        "RouteAttribute",
                        Route {
                            path: "/".to_string(),
                            bound_to: None,
                        },
                    ))
                    .annotate(tag("PlainAttribute")),
            ),
        )
        // subtype hierarchy
        .define(TypeDef::class("bt_it.MyBaseType").implements(COLLECTOR))
        .define(TypeDef::class("bt_it.SubA").with_params(["T"]).extends("bt_it.MyBaseType"))
        .define(
            TypeDef::class("bt_it.SubA.SubA_A")
                .with_params(["G", "F"])
                .extends("bt_it.MyBaseType"),
        )
        .define(TypeDef::class("bt_it.SubB").extends(sub_a_of(GenericArg::Type(TypeRef::plain("int")))))
        .define(
            TypeDef::class("bt_it.SubC")
                .with_params(["T"])
                .extends(sub_a_of(GenericArg::param("T"))),
        )
        .define(TypeDef::class("bt_it.SubD").extends("bt_it.SubB"))
        .define(TypeDef::interface("bt_it.IMyInterface").implements(COLLECTOR))
        .define(TypeDef::class("bt_it.ImpA").with_params(["T"]).implements("bt_it.IMyInterface"))
        .define(
            TypeDef::class("bt_it.ImpA.ImpA_A")
                .with_params(["G", "F"])
                .implements("bt_it.IMyInterface"),
        )
        .define(TypeDef::class("bt_it.ImpB").extends(imp_a_int))
        .define(TypeDef::structure("bt_it.ImpS").implements("bt_it.IMyInterface"))
        .records(vec![
            Record::member("innerA.innerB.TestClassA", "Bar"),
            Record::member("innerA.innerB.TestClassA", "Foo"),
            Record::member("innerA.innerB.TestClassA", "Foo2"),
            Record::ty("innerA.innerB.TestGenericB"),
            Record::ty("innerA.innerB.TestGenericB.Inner"),
            Record::member("innerA.innerB.TestGenericB.Inner", "Bar"),
            Record::ty("innerA.innerB.TestGenericB.Inner.Far"),
            Record::member("bt_it.FooEnum", "Bar"),
            Record::member("bt_it.FooEnum", "Baz"),
            Record::member("web.HomeController", "Index"),
            Record::ty("bt_it.MyBaseType"),
            Record::ty("bt_it.SubA"),
            Record::ty("bt_it.SubA.SubA_A"),
            Record::ty("bt_it.SubB"),
            Record::ty("bt_it.SubC"),
            Record::ty("bt_it.SubD"),
            Record::ty("bt_it.IMyInterface"),
            Record::ty("bt_it.ImpA"),
            Record::ty("bt_it.ImpA.ImpA_A"),
            Record::ty("bt_it.ImpB"),
            Record::ty("bt_it.ImpS"),
        ])
        .build()
}

/// Plugin module deriving from types of another module.
pub fn plugin_module(id: &str, types: &[&str]) -> Arc<Module> {
    let mut builder = Module::builder(id);
    let mut records = Vec::new();
    for ty in types {
        builder = builder.define(TypeDef::class(*ty).extends("bt_it.MyBaseType"));
        records.push(Record::ty(*ty));
    }
    builder.records(records).build()
}

/// Module defining types but never processed by the analyzer.
pub fn uninstrumented_module() -> Arc<Module> {
    Module::builder("Legacy")
        .define(TypeDef::class("legacy.OldSub").extends("bt_it.MyBaseType"))
        .define(
            TypeDef::class("legacy.Old").member(MemberDef::method("Run").annotate(tag("TGAttribute"))),
        )
        .build()
}

/// Module with subtypes of a preserving collector.
pub fn preserving_module() -> Arc<Module> {
    Module::builder("Keep")
        .define(TypeDef::class("keep.Handler").implements(PRESERVING_COLLECTOR))
        .define(TypeDef::class("keep.SpecialHandler").extends("keep.Handler"))
        .records(vec![Record::ty("keep.Handler"), Record::ty("keep.SpecialHandler")])
        .build()
}

pub fn modules(list: Vec<Arc<Module>>) -> Vec<Arc<dyn ModuleSource>> {
    list.into_iter().map(|m| m as Arc<dyn ModuleSource>).collect()
}

pub fn name_a_domain() -> Arc<Domain> {
    Domain::with_modules(modules(vec![runtime_module(), name_a_module()]))
}

pub fn sorted<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    let mut v: Vec<String> = items.into_iter().map(|t| t.to_string()).collect();
    v.sort();
    v
}

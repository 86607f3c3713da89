//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the struct, its static schema and the
//! [`Entity`](crate::core::entity::Entity) implementation in one place, so
//! the schema a filter is checked against can never drift from the fields
//! that are actually serialized.

/// Complete macro to create an entity with automatic trait implementations
///
/// The schema always starts with the `id` field, so filters and sort
/// clauses can reach the primary key directly or through a relation.
///
/// Scalar fields name their [`ScalarType`](crate::core::field::ScalarType)
/// after `=>`. Relation fields name the target entity type. They must be
/// `Option<_>` (boxed when the relation is self-referencing) and start out
/// unset. Stores persist only the related record's id and load the current
/// record when reading, so the related record must be persisted first.
///
/// # Example
///
/// ```rust,ignore
/// use dao::prelude::*;
///
/// impl_entity!(
///     Category,
///     "category",
///     "categories",
///     {
///         name: String => String,
///     },
///     relations {
///         parent: Option<Box<Category>> => Category,
///     }
/// );
///
/// // Usage
/// let mut tools = Category::new("Tools".to_string());
/// tools.parent = Some(Box::new(hardware));
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $type_name:expr,
        $table:expr,
        {
            $( $field:ident : $field_type:ty => $scalar:ident ),* $(,)?
        }
        $(
            , relations {
                $( $relation:ident : $relation_type:ty => $target:ty ),* $(,)?
            }
        )?
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Identifier, assigned by the store on first persist
            #[serde(default)]
            pub id: Option<::uuid::Uuid>,

            $( pub $field : $field_type, )*

            $($(
                #[serde(default)]
                pub $relation : $relation_type,
            )*)?
        }

        impl $crate::core::entity::Entity for $type {
            fn kind() -> &'static $crate::core::entity::EntityKind {
                static KIND: $crate::core::entity::EntityKind = $crate::core::entity::EntityKind {
                    name: $type_name,
                    table: $table,
                    id_field: "id",
                    fields: &[
                        $crate::core::entity::Field::scalar(
                            "id",
                            $crate::core::field::ScalarType::Uuid,
                        ),
                        $(
                            $crate::core::entity::Field::scalar(
                                stringify!($field),
                                $crate::core::field::ScalarType::$scalar,
                            ),
                        )*
                        $($(
                            $crate::core::entity::Field::relation(
                                stringify!($relation),
                                || <$target as $crate::core::entity::Entity>::kind(),
                            ),
                        )*)?
                    ],
                };
                &KIND
            }

            fn id(&self) -> Option<::uuid::Uuid> {
                self.id
            }

            fn set_id(&mut self, id: ::uuid::Uuid) {
                self.id = Some(id);
            }
        }

        impl $type {
            /// Create a new, not yet persisted instance of this entity
            #[allow(clippy::too_many_arguments)]
            pub fn new($( $field: $field_type ),*) -> Self {
                Self {
                    id: None,
                    $( $field, )*
                    $($( $relation: Default::default(), )*)?
                }
            }
        }
    };
}

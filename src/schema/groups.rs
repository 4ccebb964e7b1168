//! Model groups
//!
//! This module implements the content model of a complex type:
//! - sequence: ordered content
//! - choice: alternative content
//!
//! Groups nest; the component table of a complex type sees them flattened
//! into one ordered name -> element mapping.

use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::elements::Element;

/// Model group compositor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
        }
    }
}

/// A particle in a model group (element or nested group)
#[derive(Debug, Clone, PartialEq)]
pub enum GroupParticle {
    /// Element declaration
    Element(Element),
    /// Nested model group
    Group(ModelGroup),
}

impl From<Element> for GroupParticle {
    fn from(elem: Element) -> Self {
        GroupParticle::Element(elem)
    }
}

impl From<ModelGroup> for GroupParticle {
    fn from(group: ModelGroup) -> Self {
        GroupParticle::Group(group)
    }
}

/// Sequence or choice of elements and nested groups
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelGroup {
    /// Compositor
    pub model: ModelType,
    /// Particles in declaration order
    pub particles: Vec<GroupParticle>,
}

impl ModelGroup {
    /// Create an empty group
    pub fn new(model: ModelType) -> Self {
        Self {
            model,
            particles: Vec::new(),
        }
    }

    /// Create a sequence of particles
    pub fn sequence<I, P>(particles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GroupParticle>,
    {
        Self {
            model: ModelType::Sequence,
            particles: particles.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a choice between particles
    pub fn choice<I, P>(particles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GroupParticle>,
    {
        Self {
            model: ModelType::Choice,
            particles: particles.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a particle
    pub fn with_particle(mut self, particle: impl Into<GroupParticle>) -> Self {
        self.particles.push(particle.into());
        self
    }

    /// Check if the group has no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterate over all element declarations, depth first, in declared order
    pub fn iter_elements(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.particles.iter().flat_map(|p| match p {
            GroupParticle::Element(elem) => Box::new(std::iter::once(elem))
                as Box<dyn Iterator<Item = &Element> + '_>,
            GroupParticle::Group(group) => group.iter_elements(),
        }))
    }

    /// Flatten the group into an ordered name -> element mapping
    pub fn component_dict(&self) -> Result<IndexMap<String, Element>> {
        let mut dict = IndexMap::new();
        for elem in self.iter_elements() {
            if dict.insert(elem.name.clone(), elem.clone()).is_some() {
                return Err(Error::Declaration(format!(
                    "duplicate element '{}' in {} group",
                    elem.name, self.model
                )));
            }
        }
        Ok(dict)
    }
}

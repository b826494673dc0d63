use serde::{Deserialize, Serialize};

use crate::DataError;

pub type RecordId = u32;

/// How effective a damage or status category is against a monster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Resistance {
	VeryResistant,
	Resistant,
	#[default]
	Neutral,
	Weak,
	VeryWeak,
}

impl Resistance {
	pub const ALL: [Self; 5] = [Self::VeryWeak, Self::Weak, Self::Neutral, Self::Resistant, Self::VeryResistant];

	pub fn level(self) -> i8 {
		match self {
			Self::VeryResistant => -2,
			Self::Resistant => -1,
			Self::Neutral => 0,
			Self::Weak => 1,
			Self::VeryWeak => 2,
		}
	}

	pub fn symbol(self) -> &'static str {
		match self {
			Self::VeryResistant => "↑↑",
			Self::Resistant => "↑",
			Self::Neutral => "-",
			Self::Weak => "↓",
			Self::VeryWeak => "↓↓",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::VeryResistant => "Very Resistant",
			Self::Resistant => "Resist",
			Self::Neutral => "Neutral",
			Self::Weak => "Weak",
			Self::VeryWeak => "Very Weak",
		}
	}
}

impl TryFrom<i8> for Resistance {
	type Error = DataError;

	fn try_from(level: i8) -> Result<Self, Self::Error> {
		Ok(match level {
			-2 => Self::VeryResistant,
			-1 => Self::Resistant,
			0 => Self::Neutral,
			1 => Self::Weak,
			2 => Self::VeryWeak,
			_ => return Err(DataError::ResistanceOutOfRange(level)),
		})
	}
}

impl From<Resistance> for i8 {
	fn from(val: Resistance) -> Self {
		val.level()
	}
}

// ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterType {
	Power,
	Speed,
	Tech,
}

impl MonsterType {
	pub fn name(self) -> &'static str {
		match self {
			Self::Power => "Power",
			Self::Speed => "Speed",
			Self::Tech => "Tech",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ailment {
	Poison,
	Burn,
	Paralysis,
	Sleep,
	Blast,
	Bleed,
	Blind,
}

impl Ailment {
	pub const ALL: [Self; 7] = [
		Self::Poison,
		Self::Burn,
		Self::Paralysis,
		Self::Sleep,
		Self::Blast,
		Self::Bleed,
		Self::Blind,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::Poison => "Poison",
			Self::Burn => "Burn",
			Self::Paralysis => "Paralysis",
			Self::Sleep => "Sleep",
			Self::Blast => "Blast",
			Self::Bleed => "Bleed",
			Self::Blind => "Blind",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
	Normal,
	Fire,
	Water,
	Thunder,
	Ice,
	Dragon,
}

impl Element {
	pub const ALL: [Self; 6] = [Self::Normal, Self::Fire, Self::Water, Self::Thunder, Self::Ice, Self::Dragon];

	pub fn name(self) -> &'static str {
		match self {
			Self::Normal => "Normal",
			Self::Fire => "Fire",
			Self::Water => "Water",
			Self::Thunder => "Thunder",
			Self::Ice => "Ice",
			Self::Dragon => "Dragon",
		}
	}
}

/// Resistance against every ailment. All fields are required, unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ailments {
	pub poison: Resistance,
	pub burn: Resistance,
	pub paralysis: Resistance,
	pub sleep: Resistance,
	pub blast: Resistance,
	pub bleed: Resistance,
	pub blind: Resistance,
}

impl Ailments {
	pub fn get(&self, ailment: Ailment) -> Resistance {
		match ailment {
			Ailment::Poison => self.poison,
			Ailment::Burn => self.burn,
			Ailment::Paralysis => self.paralysis,
			Ailment::Sleep => self.sleep,
			Ailment::Blast => self.blast,
			Ailment::Bleed => self.bleed,
			Ailment::Blind => self.blind,
		}
	}

	/// In display order.
	pub fn iter(&self) -> impl Iterator<Item = (Ailment, Resistance)> + '_ {
		Ailment::ALL.into_iter().map(|a| (a, self.get(a)))
	}
}

/// Resistance against every element. All fields are required, unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Elements {
	pub normal: Resistance,
	pub fire: Resistance,
	pub water: Resistance,
	pub thunder: Resistance,
	pub ice: Resistance,
	pub dragon: Resistance,
}

impl Elements {
	pub fn get(&self, element: Element) -> Resistance {
		match element {
			Element::Normal => self.normal,
			Element::Fire => self.fire,
			Element::Water => self.water,
			Element::Thunder => self.thunder,
			Element::Ice => self.ice,
			Element::Dragon => self.dragon,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (Element, Resistance)> + '_ {
		Element::ALL.into_iter().map(|e| (e, self.get(e)))
	}

	/// Elements the monster is weak to, most effective first.
	pub fn weaknesses(&self) -> Vec<Element> {
		let mut weak = self
			.iter()
			.filter(|(_, r)| *r > Resistance::Neutral)
			.collect::<Vec<_>>();
		weak.sort_by(|a, b| b.1.cmp(&a.1));
		weak.into_iter().map(|(e, _)| e).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
	pub name: String,
	pub slash: bool,
	pub pierce: bool,
	pub blunt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enraged {
	pub trigger: String,
	#[serde(rename = "type")]
	pub kind: MonsterType,
}

/// A named form of a monster that overrides some of the base record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
	pub name: String,
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<MonsterType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub element: Option<Element>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ailments: Option<Ailments>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub elements: Option<Elements>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parts: Option<Vec<Part>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enraged: Option<Enraged>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
	pub id: RecordId,
	pub name: String,
	#[serde(default)]
	pub aliases: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub genus: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weakness: Option<String>,
	#[serde(rename = "type")]
	pub kind: MonsterType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub element: Option<Element>,
	pub ailments: Ailments,
	pub elements: Elements,
	#[serde(default)]
	pub parts: Vec<Part>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enraged: Option<Enraged>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tips: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub variants: Vec<Variant>,
}

impl Record {
	/// Every searchable name: the main name followed by the aliases.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
	}

	/// The record as seen in the named variant, with overrides applied.
	///
	/// The merged record carries no variants of its own.
	pub fn variant(&self, name: &str) -> Option<Record> {
		let variant = self.variants.iter().find(|v| v.name.eq_ignore_ascii_case(name))?;

		let mut merged = self.clone();
		merged.variants.clear();
		if let Some(kind) = variant.kind {
			merged.kind = kind;
		}
		if let Some(element) = variant.element {
			merged.element = Some(element);
		}
		if let Some(ailments) = variant.ailments {
			merged.ailments = ailments;
		}
		if let Some(elements) = variant.elements {
			merged.elements = elements;
		}
		if let Some(parts) = &variant.parts {
			merged.parts = parts.clone();
		}
		if let Some(enraged) = &variant.enraged {
			merged.enraged = Some(enraged.clone());
		}
		Some(merged)
	}
}

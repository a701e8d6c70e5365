/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     eval/data_frame.rs
 * Purpose:  Private data frames: the carriers of `@index`, `@key`,
 *           `@first`, `@last` and user-set values for the current scope.
 *
 * Frames form a strictly acyclic parent chain: every new frame copies its
 * parent's entries and holds a reference to it, so the chain only ever
 * points at older frames and lookups stay local to one frame.
 *
 * License:
 * This file is part of the hbars template engine.
 *
 * hbars is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A private data frame.
#[derive(Debug, Default)]
pub struct DataFrame {
    parent: Option<Rc<DataFrame>>,
    values: RefCell<HashMap<String, Value>>,
}

impl DataFrame {
    /// Creates an empty root frame.
    pub fn new() -> Rc<DataFrame> {
        Rc::new(DataFrame::default())
    }

    /// Returns a new frame with this frame's entries copied in and the
    /// parent reference set to this frame.
    pub fn copy(self: &Rc<Self>) -> Rc<DataFrame> {
        Rc::new(DataFrame {
            parent: Some(Rc::clone(self)),
            values: RefCell::new(self.values.borrow().clone()),
        })
    }

    /// Returns the per-iteration frame for element `index` out of `len`,
    /// with `@index`, `@key`, `@first` and `@last` set.
    pub fn iter_frame(self: &Rc<Self>, len: usize, index: usize, key: Value) -> Rc<DataFrame> {
        let frame = self.copy();

        frame.set("index", Value::Number(index as f64));
        frame.set("key", key);
        frame.set("first", Value::Bool(index == 0));
        frame.set("last", Value::Bool(index + 1 == len));

        frame
    }

    /// Sets a data value on this frame.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.values.borrow_mut().insert(name.into(), value);
    }

    /// Gets a data value from this frame; missing names are undefined.
    pub fn get(&self, name: &str) -> Value {
        self.find(std::slice::from_ref(&name.to_string()))
    }

    /// Dotted lookup: the first segment names a frame entry, the rest walk
    /// into the value. Entries are local to the frame — parents were copied
    /// in at creation.
    pub fn find(&self, parts: &[String]) -> Value {
        let values = self.values.borrow();

        let first = match parts.first() {
            Some(first) => first,
            None => return Value::Null,
        };

        let mut current = match values.get(first) {
            Some(value) => value,
            None => return Value::Null,
        };

        for part in &parts[1..] {
            match current.lookup(part) {
                Some(next) => current = next,
                None => return Value::Null,
            }
        }

        current.clone()
    }

    /// The enclosing frame, if any.
    pub fn parent(&self) -> Option<&Rc<DataFrame>> {
        self.parent.as_ref()
    }
}

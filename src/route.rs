// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The locations a user can navigate to and who may see each of them.

use std::fmt;

use crate::model::Role;

/// Only managers.
pub(crate) const MANAGERS: &[Role] = &[Role::Manager];
/// Anyone who is signed in.
pub(crate) const ANYONE: &[Role] = &[];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Route {
    Login,
    Home,
    Clientes,
    Sierras,
    Historial,
    Reportes,
    Usuarios,
    UsuarioNuevo,
    Usuario(i64),
    UsuarioEditar(i64),
}

impl Route {
    /// Every route, with placeholder ids for the parameterized ones.
    #[cfg(test)]
    pub(crate) const ALL: &'static [Self] = &[
        Self::Login,
        Self::Home,
        Self::Clientes,
        Self::Sierras,
        Self::Historial,
        Self::Reportes,
        Self::Usuarios,
        Self::UsuarioNuevo,
        Self::Usuario(1),
        Self::UsuarioEditar(1),
    ];

    /// The roles allowed to render this route, or `None` for the public login
    /// page. An empty list admits any signed-in user.
    pub(crate) const fn requirement(self) -> Option<&'static [Role]> {
        match self {
            Self::Login => None,
            Self::Home | Self::Sierras | Self::Historial => Some(ANYONE),
            Self::Clientes
            | Self::Reportes
            | Self::Usuarios
            | Self::UsuarioNuevo
            | Self::Usuario(_)
            | Self::UsuarioEditar(_) => Some(MANAGERS),
        }
    }

    /// Parses a location. Anything unrecognized lands on the dashboard.
    pub(crate) fn parse(path: &str) -> Self {
        let location = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();
        match *segments.as_slice() {
            ["login"] => Self::Login,
            ["clientes"] => Self::Clientes,
            ["sierras"] => Self::Sierras,
            ["historial"] => Self::Historial,
            ["reportes"] => Self::Reportes,
            ["usuarios"] => Self::Usuarios,
            ["usuarios", "nuevo"] => Self::UsuarioNuevo,
            ["usuarios", id] => id.parse().map_or(Self::Home, Self::Usuario),
            ["usuarios", id, "editar"] => id.parse().map_or(Self::Home, Self::UsuarioEditar),
            _ => Self::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Login => f.write_str("/login"),
            Self::Home => f.write_str("/"),
            Self::Clientes => f.write_str("/clientes"),
            Self::Sierras => f.write_str("/sierras"),
            Self::Historial => f.write_str("/historial"),
            Self::Reportes => f.write_str("/reportes"),
            Self::Usuarios => f.write_str("/usuarios"),
            Self::UsuarioNuevo => f.write_str("/usuarios/nuevo"),
            Self::Usuario(id) => write!(f, "/usuarios/{id}"),
            Self::UsuarioEditar(id) => write!(f, "/usuarios/{id}/editar"),
        }
    }
}

/// The sidebar entries, in display order.
pub(crate) const MENU: &[(&str, Route)] = &[
    ("Dashboard", Route::Home),
    ("Clientes", Route::Clientes),
    ("Sierras", Route::Sierras),
    ("Historial", Route::Historial),
    ("Reportes", Route::Reportes),
    ("Usuarios", Route::Usuarios),
];

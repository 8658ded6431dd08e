//! Host services backed by the host's SQLite tables.
//!
//! Only the columns the filter reads are part of the schema below; it follows
//! the naming of the host database (`mdl_` prefix, `contextlevel`, `instanceid`,
//! `validuntil`, ...).

use crate::error::{FilterError, Result};
use crate::host::{
    pluginfile_url, AreaFile, CapabilityChecker, CourseModule, FileRepository, FilterRegistry,
    IssuedToken, ModuleComponent, SiteDirectory, TokenIssuer, CONTEXT_LEVEL_COURSE,
    CONTEXT_LEVEL_MODULE, CONTEXT_LEVEL_USER, CONTEXT_SYSTEM,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token that does not expire and is reused across sessions.
const TOKEN_PERMANENT: i64 = 0;

/// `mdl_filter_active.active` values.
const FILTER_ON: i64 = 1;
const FILTER_DISABLED: i64 = -9999;

const CAP_ALLOW: i64 = 1;
const CAP_PROHIBIT: i64 = -1000;

/// Tables and columns read by the filter, used to build fixture databases.
#[cfg(test)]
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS mdl_config (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS mdl_user (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    lang TEXT NOT NULL DEFAULT 'en'
);
CREATE TABLE IF NOT EXISTS mdl_context (
    id INTEGER PRIMARY KEY,
    contextlevel INTEGER NOT NULL,
    instanceid INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS mdl_course_modules (
    id INTEGER PRIMARY KEY,
    course INTEGER NOT NULL,
    modname TEXT NOT NULL,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS mdl_files (
    id INTEGER PRIMARY KEY,
    contextid INTEGER NOT NULL,
    component TEXT NOT NULL,
    filearea TEXT NOT NULL,
    itemid INTEGER NOT NULL DEFAULT 0,
    filepath TEXT NOT NULL DEFAULT '/',
    filename TEXT NOT NULL,
    mimetype TEXT
);
CREATE TABLE IF NOT EXISTS mdl_filter_active (
    filter TEXT NOT NULL,
    contextid INTEGER NOT NULL,
    active INTEGER NOT NULL,
    PRIMARY KEY (filter, contextid)
);
CREATE TABLE IF NOT EXISTS mdl_external_services (
    id INTEGER PRIMARY KEY,
    shortname TEXT NOT NULL UNIQUE,
    enabled INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS mdl_external_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    token TEXT NOT NULL UNIQUE,
    tokentype INTEGER NOT NULL DEFAULT 0,
    userid INTEGER NOT NULL,
    externalserviceid INTEGER NOT NULL,
    validuntil INTEGER NOT NULL DEFAULT 0,
    timecreated INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS mdl_role_assignments (
    userid INTEGER NOT NULL,
    contextid INTEGER NOT NULL,
    roleid INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS mdl_role_capabilities (
    roleid INTEGER NOT NULL,
    capability TEXT NOT NULL,
    permission INTEGER NOT NULL
);
";

pub struct SqliteHost {
    conn: Connection,
}

impl SqliteHost {
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Creates the tables read by the filter when they are missing.
    #[cfg(test)]
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn config_value(&self, name: &str) -> Result<String> {
        self.conn
            .query_row(
                "SELECT value FROM mdl_config WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| FilterError::not_found(format!("config '{}'", name)))
    }

    fn context_id(&self, level: i64, instance_id: u64) -> Result<u64> {
        self.conn
            .query_row(
                "SELECT id FROM mdl_context WHERE contextlevel = ?1 AND instanceid = ?2",
                params![level, instance_id as i64],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map(|id| id as u64)
            .ok_or_else(|| {
                FilterError::not_found(format!("context level {} for instance {}", level, instance_id))
            })
    }

    fn filter_state(&self, filter: &str, context_id: u64) -> Result<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT active FROM mdl_filter_active WHERE filter = ?1 AND contextid = ?2",
                params![filter, context_id as i64],
                |row| row.get(0),
            )
            .optional()?)
    }
}

impl SiteDirectory for SqliteHost {
    fn wwwroot(&self) -> Result<String> {
        self.config_value("wwwroot")
    }

    fn release(&self) -> Result<String> {
        self.config_value("release")
    }

    fn user_language(&self, user_id: u64) -> Result<String> {
        self.conn
            .query_row(
                "SELECT lang FROM mdl_user WHERE id = ?1",
                params![user_id as i64],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| FilterError::not_found(format!("user {}", user_id)))
    }

    fn user_context_id(&self, user_id: u64) -> Result<u64> {
        self.context_id(CONTEXT_LEVEL_USER, user_id)
    }

    fn course_context_id(&self, course_id: u64) -> Result<u64> {
        self.context_id(CONTEXT_LEVEL_COURSE, course_id)
    }
}

impl FileRepository for SqliteHost {
    fn course_modules(&self, course_id: u64, component: ModuleComponent) -> Result<Vec<CourseModule>> {
        let mut stmt = self.conn.prepare(
            "SELECT cm.id, ctx.id, cm.name
               FROM mdl_course_modules cm
               JOIN mdl_context ctx ON ctx.contextlevel = ?1 AND ctx.instanceid = cm.id
              WHERE cm.course = ?2 AND cm.modname = ?3
           ORDER BY cm.id",
        )?;
        let modules = stmt
            .query_map(
                params![CONTEXT_LEVEL_MODULE, course_id as i64, component.modname()],
                |row| {
                    Ok(CourseModule {
                        id: row.get::<_, i64>(0)? as u64,
                        context_id: row.get::<_, i64>(1)? as u64,
                        name: row.get(2)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(modules)
    }

    fn area_files(&self, context_id: u64, component: ModuleComponent) -> Result<Vec<AreaFile>> {
        let wwwroot = self.wwwroot()?;
        let mut stmt = self.conn.prepare(
            "SELECT id, itemid, filepath, filename, COALESCE(mimetype, '')
               FROM mdl_files
              WHERE contextid = ?1 AND component = ?2 AND filearea = 'content' AND filename <> '.'
           ORDER BY filepath, filename",
        )?;
        let files = stmt
            .query_map(params![context_id as i64, component.component()], |row| {
                let itemid = row.get::<_, i64>(1)? as u64;
                let filepath: String = row.get(2)?;
                let filename: String = row.get(3)?;
                Ok(AreaFile {
                    id: row.get::<_, i64>(0)? as u64,
                    fileurl: pluginfile_url(
                        &wwwroot,
                        context_id,
                        component.component(),
                        "content",
                        itemid,
                        &filepath,
                        &filename,
                    ),
                    filepath,
                    filename,
                    mimetype: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files)
    }
}

impl TokenIssuer for SqliteHost {
    fn token_for_user(&self, user_id: u64, service: &str) -> Result<Option<IssuedToken>> {
        let service_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM mdl_external_services WHERE shortname = ?1 AND enabled = 1",
                params![service],
                |row| row.get(0),
            )
            .optional()?;
        let Some(service_id) = service_id else {
            return Ok(None);
        };

        let now = unix_now();
        let existing = self
            .conn
            .query_row(
                "SELECT token, validuntil FROM mdl_external_tokens
                  WHERE userid = ?1 AND externalserviceid = ?2 AND tokentype = ?3
                    AND (validuntil = 0 OR validuntil > ?4)
               ORDER BY id LIMIT 1",
                params![user_id as i64, service_id, TOKEN_PERMANENT, now as i64],
                |row| {
                    Ok(IssuedToken {
                        token: row.get(0)?,
                        valid_until: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        if existing.is_some() {
            return Ok(existing);
        }

        let token = format!("{:x}", md5::compute(uuid::Uuid::new_v4().to_string()));
        self.conn.execute(
            "INSERT INTO mdl_external_tokens (token, tokentype, userid, externalserviceid, validuntil, timecreated)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![&token, TOKEN_PERMANENT, user_id as i64, service_id, now as i64],
        )?;

        Ok(Some(IssuedToken {
            token,
            valid_until: 0,
        }))
    }
}

impl CapabilityChecker for SqliteHost {
    fn has_capability(&self, user_id: u64, capability: &str, context_id: u64) -> Result<bool> {
        let (allowed, prohibited): (i64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(rc.permission = ?4), 0), COALESCE(SUM(rc.permission = ?5), 0)
               FROM mdl_role_assignments ra
               JOIN mdl_role_capabilities rc ON rc.roleid = ra.roleid
              WHERE ra.userid = ?1 AND ra.contextid IN (?2, ?3) AND rc.capability = ?6",
            params![
                user_id as i64,
                context_id as i64,
                CONTEXT_SYSTEM as i64,
                CAP_ALLOW,
                CAP_PROHIBIT,
                capability
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(allowed > 0 && prohibited == 0)
    }
}

impl FilterRegistry for SqliteHost {
    /// A filter disabled site-wide stays off; otherwise the course setting
    /// overrides the site default.
    fn is_filter_active(&self, filter: &str, course_context_id: u64) -> Result<bool> {
        let site = self.filter_state(filter, CONTEXT_SYSTEM)?;
        if matches!(site, None | Some(FILTER_DISABLED)) {
            return Ok(false);
        }

        let course = self.filter_state(filter, course_context_id)?;
        Ok(course.or(site) == Some(FILTER_ON))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::host::{COURSE_UPDATE_CAPABILITY, MOBILE_SERVICE};

    /// Course 5 with a resource (module 12) and a folder (module 13), a
    /// student (user 3) and a teacher (user 4).
    pub(crate) fn seeded_host() -> SqliteHost {
        let host = SqliteHost::from_connection(Connection::open_in_memory().unwrap());
        seed(&host);
        host
    }

    pub(crate) fn seed(host: &SqliteHost) {
        host.init_schema().unwrap();
        host.connection()
            .execute_batch(
                "
            INSERT INTO mdl_config VALUES ('wwwroot', 'http://lms.test'), ('release', '4.1.2 (Build: 20230313)');
            INSERT INTO mdl_user VALUES (3, 'student', 'fr_ca'), (4, 'teacher', 'en');
            INSERT INTO mdl_context VALUES
                (1, 10, 0),
                (21, 30, 3), (22, 30, 4),
                (50, 50, 5),
                (7, 70, 12), (8, 70, 13), (9, 70, 14);
            INSERT INTO mdl_course_modules VALUES
                (12, 5, 'resource', 'Syllabus'),
                (13, 5, 'folder', 'Slides'),
                (14, 6, 'resource', 'Other course');
            INSERT INTO mdl_files (id, contextid, component, filearea, itemid, filepath, filename, mimetype) VALUES
                (98, 7, 'mod_resource', 'content', 0, '/', '.', NULL),
                (99, 7, 'mod_resource', 'content', 0, '/', 'doc.pdf', 'application/pdf'),
                (100, 8, 'mod_folder', 'content', 0, '/', 'week1.pdf', 'application/pdf'),
                (101, 8, 'mod_folder', 'content', 0, '/', 'notes.docx', 'application/msword'),
                (102, 8, 'mod_folder', 'intro', 0, '/', 'intro.pdf', 'application/pdf'),
                (103, 9, 'mod_resource', 'content', 0, '/', 'other.pdf', 'application/pdf');
            INSERT INTO mdl_filter_active VALUES ('amanote', 1, -1), ('amanote', 50, 1);
            INSERT INTO mdl_external_services VALUES (1, 'moodle_mobile_app', 1);
            INSERT INTO mdl_role_assignments VALUES (3, 50, 5), (4, 50, 3);
            INSERT INTO mdl_role_capabilities VALUES (3, 'moodle/course:update', 1), (5, 'moodle/course:view', 1);
            ",
            )
            .unwrap();
    }

    #[test]
    fn site_directory_lookups() {
        let host = seeded_host();

        assert_eq!(host.wwwroot().unwrap(), "http://lms.test");
        assert_eq!(host.user_language(3).unwrap(), "fr_ca");
        assert_eq!(host.user_context_id(3).unwrap(), 21);
        assert_eq!(host.course_context_id(5).unwrap(), 50);
        assert!(matches!(host.user_context_id(77), Err(FilterError::NotFound { .. })));
    }

    #[test]
    fn modules_and_area_files() {
        let host = seeded_host();

        let resources = host.course_modules(5, ModuleComponent::Resource).unwrap();
        assert_eq!(
            resources,
            vec![CourseModule {
                id: 12,
                context_id: 7,
                name: "Syllabus".to_string()
            }]
        );

        let files = host.area_files(8, ModuleComponent::Folder).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["notes.docx", "week1.pdf"]);
        assert_eq!(
            files[1].fileurl,
            "http://lms.test/webservice/pluginfile.php/8/mod_folder/content/0/week1.pdf"
        );
    }

    #[test]
    fn token_is_created_once_then_reused() {
        let host = seeded_host();

        let first = host.token_for_user(3, MOBILE_SERVICE).unwrap().unwrap();
        let second = host.token_for_user(3, MOBILE_SERVICE).unwrap().unwrap();

        assert_eq!(first.token.len(), 32);
        assert_eq!(first, second);
        assert_eq!(first.valid_until, 0);
    }

    #[test]
    fn expired_token_is_replaced() {
        let host = seeded_host();
        host.connection()
            .execute(
                "INSERT INTO mdl_external_tokens (token, tokentype, userid, externalserviceid, validuntil, timecreated)
                 VALUES ('old', 0, 3, 1, 10, 1)",
                [],
            )
            .unwrap();

        let token = host.token_for_user(3, MOBILE_SERVICE).unwrap().unwrap();
        assert_ne!(token.token, "old");
    }

    #[test]
    fn no_token_without_enabled_service() {
        let host = seeded_host();
        host.connection()
            .execute("UPDATE mdl_external_services SET enabled = 0", [])
            .unwrap();

        assert_eq!(host.token_for_user(3, MOBILE_SERVICE).unwrap(), None);
        assert_eq!(host.token_for_user(3, "unknown_service").unwrap(), None);
    }

    #[test]
    fn capability_checks() {
        let host = seeded_host();

        assert!(host.has_capability(4, COURSE_UPDATE_CAPABILITY, 50).unwrap());
        assert!(!host.has_capability(3, COURSE_UPDATE_CAPABILITY, 50).unwrap());

        host.connection()
            .execute_batch(
                "INSERT INTO mdl_role_assignments VALUES (4, 50, 9);
                 INSERT INTO mdl_role_capabilities VALUES (9, 'moodle/course:update', -1000);",
            )
            .unwrap();
        assert!(!host.has_capability(4, COURSE_UPDATE_CAPABILITY, 50).unwrap());
    }

    #[test]
    fn filter_activation_rules() {
        let host = seeded_host();

        // Off-but-available site wide, switched on for course 5.
        assert!(host.is_filter_active("amanote", 50).unwrap());
        // No course override: site default applies.
        assert!(!host.is_filter_active("amanote", 51).unwrap());

        host.connection()
            .execute(
                "UPDATE mdl_filter_active SET active = -9999 WHERE contextid = 1",
                [],
            )
            .unwrap();
        assert!(!host.is_filter_active("amanote", 50).unwrap());
        assert!(!host.is_filter_active("unknown", 50).unwrap());
    }
}

//! Exclusively owned driver object names.

use std::fmt;
use std::marker::PhantomData;

use gl;
use gl::types::*;

use crate::errors::*;

/// Describes how to allocate and release one kind of driver object.
pub trait HandleKind {
    /// Human readable name used in error messages.
    const NAME: &'static str;

    /// Allocates a new object, returns zero on failure.
    unsafe fn create() -> GLuint;

    /// Releases a object which was returned by `create`.
    unsafe fn delete(id: GLuint);
}

/// `Handle` owns exactly one driver object name. It is move-only, and the object is
/// released exactly once when the owning `Handle` is destroyed or dropped.
///
/// A handle could also wrap a name which is owned somewhere else, destroying such
/// handle only forgets the name.
pub struct Handle<K: HandleKind> {
    id: GLuint,
    owned: bool,
    // Driver objects belong to the thread which owns the context.
    _marker: PhantomData<(K, *const ())>,
}

impl<K: HandleKind> Handle<K> {
    /// Allocates a new driver object.
    pub fn new() -> Result<Self> {
        let id = unsafe { K::create() };
        if id == 0 {
            return Err(Error::Allocation(K::NAME));
        }

        Ok(Handle {
            id,
            owned: true,
            _marker: PhantomData,
        })
    }

    /// Wraps a name without taking its ownership.
    #[inline]
    pub fn wrap(id: GLuint) -> Self {
        Handle {
            id,
            owned: false,
            _marker: PhantomData,
        }
    }

    /// Constructs a handle which refers to nothing.
    #[inline]
    pub fn empty() -> Self {
        Handle::wrap(0)
    }

    #[inline]
    pub fn id(&self) -> GLuint {
        self.id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Releases the object if it is owned, and resets this handle to empty. Calling
    /// `destroy` on a empty handle is a no-op.
    pub fn destroy(&mut self) {
        if self.owned && self.id != 0 {
            unsafe { K::delete(self.id) };
        }

        self.id = 0;
        self.owned = false;
    }

    /// Moves the object out, and leaves a empty handle behind.
    #[inline]
    pub fn take(&mut self) -> Self {
        ::std::mem::replace(self, Handle::empty())
    }
}

impl<K: HandleKind> Default for Handle<K> {
    fn default() -> Self {
        Handle::empty()
    }
}

impl<K: HandleKind> Drop for Handle<K> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({}", K::NAME, self.id)?;
        if !self.owned && self.id != 0 {
            write!(f, ", wrapped")?;
        }
        write!(f, ")")
    }
}

pub enum TextureObject {}

impl HandleKind for TextureObject {
    const NAME: &'static str = "Texture";

    unsafe fn create() -> GLuint {
        let mut id = 0;
        gl::GenTextures(1, &mut id);
        id
    }

    unsafe fn delete(id: GLuint) {
        gl::DeleteTextures(1, &id);
    }
}

pub enum FramebufferObject {}

impl HandleKind for FramebufferObject {
    const NAME: &'static str = "Framebuffer";

    unsafe fn create() -> GLuint {
        let mut id = 0;
        gl::GenFramebuffers(1, &mut id);
        id
    }

    unsafe fn delete(id: GLuint) {
        gl::DeleteFramebuffers(1, &id);
    }
}

pub enum BufferObject {}

impl HandleKind for BufferObject {
    const NAME: &'static str = "Buffer";

    unsafe fn create() -> GLuint {
        let mut id = 0;
        gl::GenBuffers(1, &mut id);
        id
    }

    unsafe fn delete(id: GLuint) {
        gl::DeleteBuffers(1, &id);
    }
}

pub enum VertexArrayObject {}

impl HandleKind for VertexArrayObject {
    const NAME: &'static str = "VertexArray";

    unsafe fn create() -> GLuint {
        let mut id = 0;
        gl::GenVertexArrays(1, &mut id);
        id
    }

    unsafe fn delete(id: GLuint) {
        gl::DeleteVertexArrays(1, &id);
    }
}

pub enum ProgramObject {}

impl HandleKind for ProgramObject {
    const NAME: &'static str = "Program";

    unsafe fn create() -> GLuint {
        gl::CreateProgram()
    }

    unsafe fn delete(id: GLuint) {
        gl::DeleteProgram(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    thread_local! {
        static LIVE: RefCell<Vec<GLuint>> = RefCell::new(Vec::new());
        static NEXT: RefCell<GLuint> = RefCell::new(1);
    }

    enum Counting {}

    impl HandleKind for Counting {
        const NAME: &'static str = "Counting";

        unsafe fn create() -> GLuint {
            let id = NEXT.with(|v| {
                let mut v = v.borrow_mut();
                let id = *v;
                *v += 1;
                id
            });

            LIVE.with(|v| v.borrow_mut().push(id));
            id
        }

        unsafe fn delete(id: GLuint) {
            LIVE.with(|v| {
                let mut v = v.borrow_mut();
                let index = v.iter().position(|&x| x == id).expect("double release");
                v.remove(index);
            });
        }
    }

    enum Exhausted {}

    impl HandleKind for Exhausted {
        const NAME: &'static str = "Exhausted";

        unsafe fn create() -> GLuint {
            0
        }

        unsafe fn delete(_: GLuint) {
            unreachable!();
        }
    }

    fn live() -> usize {
        LIVE.with(|v| v.borrow().len())
    }

    #[test]
    fn release_once() {
        let before = live();
        {
            let mut handle = Handle::<Counting>::new().unwrap();
            assert!(!handle.is_empty());
            assert!(handle.is_owned());
            assert_eq!(live(), before + 1);

            handle.destroy();
            assert!(handle.is_empty());
            assert_eq!(live(), before);

            handle.destroy();
        }

        assert_eq!(live(), before);
    }

    #[test]
    fn move_transfers_ownership() {
        let before = live();

        let mut a = Handle::<Counting>::new().unwrap();
        let id = a.id();
        let b = a.take();

        assert!(a.is_empty());
        assert_eq!(b.id(), id);
        drop(a);
        assert_eq!(live(), before + 1);

        let c = b;
        assert_eq!(c.id(), id);
        drop(c);
        assert_eq!(live(), before);
    }

    #[test]
    fn wrapped_is_never_released() {
        let owner = Handle::<Counting>::new().unwrap();
        let before = live();

        {
            let wrapped = Handle::<Counting>::wrap(owner.id());
            assert!(!wrapped.is_owned());
            assert_eq!(format!("{:?}", wrapped), format!("Counting({}, wrapped)", owner.id()));
        }

        assert_eq!(live(), before);
    }

    #[test]
    fn zero_name_is_allocation_failure() {
        match Handle::<Exhausted>::new() {
            Err(Error::Allocation(name)) => assert_eq!(name, "Exhausted"),
            other => panic!("unexpected {:?}", other.map(|v| v.id())),
        }

        let empty = Handle::<Exhausted>::empty();
        assert!(empty.is_empty());
    }
}
